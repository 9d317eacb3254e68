service! {
    /// Users, groups and sessions.
    SecurityService => Security {
        fn list_users = "ListUsers"();
        fn list_groups = "ListGroups"();
        fn get_user = "GetUser"(user_guid: "userGuid");
        fn create_user = "CreateUser"(user: "userInfo");
        fn update_user = "UpdateUser"(user: "userInfo");
        fn delete_user = "DeleteUser"(user_guid: "userGuid");
        fn list_users_of_group = "ListUsersOfGroup"(group_guid: "groupGuid");
        fn create_group = "CreateGroup"(group: "groupInfo");
        fn delete_group = "DeleteGroup"(group_guid: "groupGuid");

        /// `password_hash` is the salted SHA-1 hash memoQ expects, not the
        /// password itself.
        fn login = "Login"(user_name: "userName", password_hash: "passwordHash");
        fn logout = "Logout"(session_id: "sessionId");
    }
}
