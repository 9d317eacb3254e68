service! {
    /// Translation memories.
    TmService => Tm {
        /// Both languages may be `None` to list every TM.
        fn list_tms = "ListTMs"(source_language: "srcLang", target_language: "targetLang");
        fn get_tm_info = "GetTMInfo"(tm_guid: "tmGuid");
        fn create_and_publish = "CreateAndPublish"(info: "info");
        fn delete_tm = "DeleteTM"(tm_guid: "tmGuid");

        fn begin_chunked_tmx_import = "BeginChunkedTMXImport"(tm_guid: "tmGuid");
        /// `tmx_data` is the base64 text of the next chunk.
        fn add_next_tmx_chunk = "AddNextTMXChunk"(session_id: "sessionId", tmx_data: "tmxData");
        fn end_chunked_tmx_import = "EndChunkedTMXImport"(session_id: "sessionId");

        fn begin_chunked_tmx_export = "BeginChunkedTMXExport"(tm_guid: "tmGuid");
        fn get_next_tmx_chunk = "GetNextTMXChunk"(session_id: "sessionId");
        fn end_chunked_tmx_export = "EndChunkedTMXExport"(session_id: "sessionId");

        /// `expressions` is a `string[]` of search terms.
        fn concordance = "Concordance"(tm_guid: "tmGuid", expressions: "expressions", options: "options");
    }
}
