service! {
    /// Light resources. `resource_type` is a `ResourceType` name such as
    /// `"SegRules"` or `"QASettings"`.
    ResourceService => Resource {
        fn list_resources = "ListResources"(resource_type: "resourceType", filter: "filter");
        fn get_resource_info = "GetResourceInfo"(resource_type: "resourceType", guid: "resGuid");
        fn delete_resource = "DeleteResource"(resource_type: "resourceType", guid: "resGuid");
        /// Returns the GUID of a file to download through the file manager.
        fn export_resource = "ExportResource"(resource_type: "resourceType", guid: "resGuid");
        fn import_new_resource = "ImportNewResource"(
            resource_type: "resourceType",
            file_guid: "fileGuid",
            info: "resInfo",
        );
    }
}
