service! {
    /// Enterprise license management. Its operations are reached through
    /// [`Service::call`](crate::Service::call).
    LicenseService => License {}
}
