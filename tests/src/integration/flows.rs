//! # Integration Test Flows
//!
//! End-to-end flows through the comparison service: project loading,
//! dual-candidate comparison retrieval with sign correction, caching,
//! saved-set persistence, and tab-separated export/import.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dge_engine::ports::{InMemoryAbundanceStore, InMemoryStore, StaticResourceRetriever};
    use dge_engine::{
        ComparisonEngineApi, ComparisonService, EngineConfig, PersistentStore, ProjectManifest,
        SortOrder, SortPath, Treatment,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const WT_KO_TABLE: &str = "id\tlogFC\tlogCPM\tPValue\n\
                               ActA\t2.5\t6.0\t0.001\n\
                               BmpR\t-1.2\t4.5\t0.04\n\
                               Cdk1\t0.3\t8.0\t0.7\n";

    const WT_HS_TABLE: &str = "id\tlogFC\tlogCPM\tPValue\n\
                               ActA\t-0.5\t5.5\t0.3\n\
                               Cdk1\t1.8\t7.0\t0.002\n";

    fn manifest() -> ProjectManifest {
        let mut manifest = ProjectManifest::new("axolotl-atlas");
        manifest.treatments = vec![
            Treatment::new("WT", "Wild type").with_replicates(vec!["wt1".into(), "wt2".into()]),
            Treatment::new("KO", "Knockout").with_replicates(vec!["ko1".into(), "ko2".into()]),
            Treatment::new("HS", "Heat shock").with_replicates(vec!["hs1".into()]),
        ];
        manifest.transcript_names =
            vec!["ActA".to_string(), "BmpR".to_string(), "Cdk1".to_string()];
        manifest
            .aliases
            .insert("ActA".to_string(), vec!["activin-a".to_string()]);
        manifest
    }

    fn retriever() -> StaticResourceRetriever {
        StaticResourceRetriever::new()
            .with_resource("./pairwise_tests/WT_KO.txt", WT_KO_TABLE)
            .with_resource("./pairwise_tests/WT_HS.txt", WT_HS_TABLE)
    }

    fn service(
        retriever: Arc<StaticResourceRetriever>,
        storage: Arc<InMemoryStore>,
    ) -> ComparisonService<StaticResourceRetriever, InMemoryAbundanceStore, InMemoryStore> {
        let abundances = InMemoryAbundanceStore::new()
            .with_series("WT", "ActA", vec![10.0, 14.0])
            .with_series("KO", "ActA", vec![2.0, 3.0, 4.0]);
        ComparisonService::new(
            EngineConfig::for_testing(),
            retriever,
            Arc::new(abundances),
            storage,
        )
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_load_compare_save_export_flow() {
        crate::init_tracing();
        let storage = Arc::new(InMemoryStore::new());
        let service = service(Arc::new(retriever()), storage.clone());
        service.load_project(manifest()).await.unwrap();

        // The default pair follows manifest order.
        let (a, b) = service.default_comparison().await.unwrap();
        assert_eq!((a.as_str(), b.as_str()), ("WT", "KO"));

        let cmp = service.set_pairwise_comparison(&a, &b).await.unwrap();
        assert_eq!(cmp.len(), 3);
        assert_eq!(cmp.min_p_value, 0.001);

        // Default sort is p-value ascending.
        let sorted = service.update_sort(None, None).await.unwrap();
        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ActA", "BmpR", "Cdk1"]);

        // Saving through an alias canonicalizes and persists.
        service
            .set_saved_transcripts(vec!["activin-a".to_string(), "Cdk1".to_string()])
            .await
            .unwrap();
        let persisted = storage.get("axolotl-atlas-watched").unwrap();
        let names: Vec<String> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(names, vec!["ActA".to_string(), "Cdk1".to_string()]);

        // Export covers exactly the displayed (saved) rows, abundance
        // columns filled from the store.
        let tsv = service.export_displayed_transcripts().await.unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Gene name\tpValue\tlogATA\tlogFC\tWT mean abundance\tWT median abundance\tKO mean abundance\tKO median abundance"
        );
        assert_eq!(lines[1], "ActA\t0.001\t6\t2.5\t12\t12\t3\t3");
        assert!(lines[2].starts_with("Cdk1\t0.7"));
    }

    #[tokio::test]
    async fn test_opposite_orders_have_opposite_fold_changes() {
        let service = service(Arc::new(retriever()), Arc::new(InMemoryStore::new()));
        service.load_project(manifest()).await.unwrap();

        let forward = service.set_pairwise_comparison("WT", "KO").await.unwrap();
        let reverse = service.set_pairwise_comparison("KO", "WT").await.unwrap();

        for name in ["ActA", "BmpR", "Cdk1"] {
            let f = forward.get(name).unwrap();
            let r = reverse.get(name).unwrap();
            assert_eq!(f.log_fc.unwrap(), -r.log_fc.unwrap());
            assert_eq!(f.log_ata, r.log_ata);
            assert_eq!(f.p_value, r.p_value);
        }
    }

    #[tokio::test]
    async fn test_switching_comparisons_uses_cache() {
        let retriever = Arc::new(retriever());
        let service = service(retriever.clone(), Arc::new(InMemoryStore::new()));
        service.load_project(manifest()).await.unwrap();

        service.set_pairwise_comparison("WT", "KO").await.unwrap();
        service.set_pairwise_comparison("WT", "HS").await.unwrap();
        let after_two = retriever.fetch_count();

        // Revisiting both pairs touches the retriever no further.
        service.set_pairwise_comparison("WT", "KO").await.unwrap();
        let cmp = service.set_pairwise_comparison("WT", "HS").await.unwrap();
        assert_eq!(retriever.fetch_count(), after_two);
        assert_eq!(cmp.len(), 2);
    }

    #[tokio::test]
    async fn test_saved_set_survives_restart_and_import_merges() {
        let storage = Arc::new(InMemoryStore::new());
        {
            let service = service(Arc::new(retriever()), storage.clone());
            service.load_project(manifest()).await.unwrap();
            service
                .set_saved_transcripts(vec!["BmpR".to_string()])
                .await
                .unwrap();
        }

        let service = service(Arc::new(retriever()), storage);
        service.load_project(manifest()).await.unwrap();
        service.set_pairwise_comparison("WT", "KO").await.unwrap();

        // Restored set displays immediately.
        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].name, "BmpR");

        // Importing an exported table merges into the restored set.
        let report = service
            .import_saved_transcripts("Gene name\tpValue\nactivin-a\t0.001\nnonesuch\n")
            .await
            .unwrap();
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.skipped, vec!["nonesuch".to_string()]);

        let displayed = service.update_displayed().await.unwrap();
        let names: Vec<&str> = displayed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ActA", "BmpR"]);
    }

    #[tokio::test]
    async fn test_search_spans_names_and_aliases() {
        let service = service(Arc::new(retriever()), Arc::new(InMemoryStore::new()));
        service.load_project(manifest()).await.unwrap();

        assert_eq!(
            service.search_transcripts("a").await.unwrap(),
            vec!["ActA".to_string()]
        );
        assert_eq!(
            service.search_transcripts("B").await.unwrap(),
            vec!["BmpR".to_string()]
        );
        assert!(service.search_transcripts("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sort_state_carries_across_comparisons() {
        let service = service(Arc::new(retriever()), Arc::new(InMemoryStore::new()));
        service.load_project(manifest()).await.unwrap();
        service.set_pairwise_comparison("WT", "KO").await.unwrap();
        service
            .update_sort(Some(SortPath::LogFc), Some(SortOrder::Desc))
            .await
            .unwrap();

        // A newly loaded comparison comes back already ordered by the
        // sticky sort choice.
        let sorted = {
            service.set_pairwise_comparison("WT", "HS").await.unwrap();
            service.update_sort(None, None).await.unwrap()
        };
        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cdk1", "ActA"]);
    }
}
