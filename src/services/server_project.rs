service! {
    /// Server projects: creation, documents, users and statistics.
    ServerProjectService => ServerProject {
        /// `filter` is a `ServerProjectListFilter`, or `None` for every project.
        fn list_projects = "ListProjects"(filter: "filter");
        fn get_project = "GetProject"(project_guid: "spGuid");
        fn create_project = "CreateProject"(info: "spInfo");
        fn create_project_from_template = "CreateProjectFromTemplate"(create_info: "createInfo");
        fn delete_project = "DeleteProject"(project_guid: "spGuid");

        fn list_project_translation_documents = "ListProjectTranslationDocuments"(
            project_guid: "serverProjectGuid",
        );

        /// `target_languages` is a `string[]`, see [`string_array`](crate::string_array).
        fn import_translation_document = "ImportTranslationDocument"(
            project_guid: "serverProjectGuid",
            file_guid: "fileGuid",
            target_languages: "targetLangCodes",
            import_settings: "importSettings",
        );

        fn export_translation_document = "ExportTranslationDocument"(
            project_guid: "serverProjectGuid",
            document_guid: "docGuid",
        );

        fn list_project_users = "ListProjectUsers"(project_guid: "serverProjectGuid");
        fn set_project_users = "SetProjectUsers"(project_guid: "serverProjectGuid", users: "userInfos");
        fn list_project_tms = "ListProjectTMs"(
            project_guid: "serverProjectGuid",
            target_languages: "targetLangCodes",
        );

        fn get_statistics_on_project = "GetStatisticsOnProject"(
            project_guid: "serverProjectGuid",
            target_languages: "targetLangCodes",
            options: "options",
            format: "resultFormat",
        );
    }
}
