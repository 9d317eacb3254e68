service! {
    /// LiveDocs corpora.
    LiveDocsService => LiveDocs {
        fn list_corpora = "ListCorpora"();
        fn get_corpus = "GetCorpus"(corpus_guid: "corpusGuid");
        fn delete_corpus = "DeleteCorpus"(corpus_guid: "corpusGuid");
    }
}
