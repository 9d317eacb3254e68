service! {
    /// Chunked upload and download of files, referenced elsewhere by GUID.
    FileManagerService => FileManager {
        fn begin_chunked_file_upload = "BeginChunkedFileUpload"(file_name: "fileName", is_zipped: "isZipped");
        /// `data` is the base64 text of the chunk.
        fn add_next_file_chunk = "AddNextFileChunk"(file_guid: "fileIdAndSessionId", data: "fileData");
        fn end_chunked_file_upload = "EndChunkedFileUpload"(file_guid: "fileIdAndSessionId");

        fn begin_chunked_file_download = "BeginChunkedFileDownload"(file_guid: "fileGuid", zip: "zip");
        fn get_next_file_chunk = "GetNextFileChunk"(session_id: "sessionId", byte_count: "byteCount");
        fn end_chunked_file_download = "EndChunkedFileDownload"(session_id: "sessionId");

        fn delete_file = "DeleteFile"(file_guid: "fileGuid");
    }
}
