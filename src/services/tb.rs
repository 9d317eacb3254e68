service! {
    /// Term bases.
    TbService => Tb {
        fn list_tbs = "ListTBs"();
        fn get_tb_info = "GetTBInfo"(tb_guid: "tbGuid");
        fn create_and_publish = "CreateAndPublish"(info: "info");
        fn delete_tb = "DeleteTB"(tb_guid: "tbGuid");
    }
}
