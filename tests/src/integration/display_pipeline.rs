//! # Display Pipeline Tests
//!
//! Selection-state choreography through the service: brushed regions,
//! bin hover/selection, thresholds, and sort behavior over generated
//! tables.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use dge_engine::ports::{InMemoryAbundanceStore, InMemoryStore, StaticResourceRetriever};
    use dge_engine::{
        BrushedArea, ComparisonEngineApi, ComparisonService, EngineConfig, ProjectManifest,
        SortOrder, SortPath, TranscriptRecord, Treatment,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const TABLE: &str = "id\tlogFC\tlogCPM\tPValue\n\
                         Up\t3.0\t6.0\t0.001\n\
                         Down\t-2.0\t4.0\t0.02\n\
                         Flat\t0.1\t9.0\t0.8\n";

    fn manifest_with(names: &[&str]) -> ProjectManifest {
        let mut manifest = ProjectManifest::new("pipeline");
        manifest.treatments = vec![
            Treatment::new("WT", "Wild type"),
            Treatment::new("KO", "Knockout"),
        ];
        manifest.transcript_names = names.iter().map(|s| s.to_string()).collect();
        manifest
    }

    async fn loaded_service(
        table: &str,
        names: &[&str],
    ) -> ComparisonService<StaticResourceRetriever, InMemoryAbundanceStore, InMemoryStore> {
        let retriever =
            StaticResourceRetriever::new().with_resource("./pairwise_tests/WT_KO.txt", table);
        let abundances = InMemoryAbundanceStore::new()
            .with_series("WT", "Up", vec![8.0, 10.0])
            .with_series("WT", "Down", vec![1.0, 2.0, 3.0]);
        let service = ComparisonService::new(
            EngineConfig::for_testing(),
            Arc::new(retriever),
            Arc::new(abundances),
            Arc::new(InMemoryStore::new()),
        );
        service.load_project(manifest_with(names)).await.unwrap();
        service.set_pairwise_comparison("WT", "KO").await.unwrap();
        service
    }

    fn names(records: &[TranscriptRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    // =============================================================================
    // SELECTION CHOREOGRAPHY
    // =============================================================================

    #[tokio::test]
    async fn test_brushed_region_with_threshold() {
        crate::init_tracing();
        let service = loaded_service(TABLE, &["Up", "Down", "Flat"]).await;

        // Region covers every point; only the threshold discriminates.
        service.set_p_value_threshold(0.05).await.unwrap();
        service
            .set_brushed_area(Some(BrushedArea::new(0.0, 10.0, -5.0, 5.0)))
            .await
            .unwrap();

        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(names(&displayed), vec!["Up", "Down"]);

        // Shrinking the region to positive fold changes drops Down.
        service
            .set_brushed_area(Some(BrushedArea::new(0.0, 10.0, 0.0, 5.0)))
            .await
            .unwrap();
        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(names(&displayed), vec!["Up"]);

        // Clearing the brush falls back to the (empty) saved set.
        service.set_brushed_area(None).await.unwrap();
        assert!(service.update_displayed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bin_selection_precedence() {
        let service = loaded_service(TABLE, &["Up", "Down", "Flat"]).await;
        service
            .set_saved_transcripts(vec!["Flat".to_string()])
            .await
            .unwrap();

        let hovered: HashSet<String> = ["Down".to_string()].into_iter().collect();
        service
            .set_hovered_bin_transcripts(Some(hovered))
            .await
            .unwrap();
        assert_eq!(names(&service.update_displayed().await.unwrap()), vec!["Down"]);

        let selected: HashSet<String> = ["Up".to_string()].into_iter().collect();
        service
            .set_selected_bin_transcripts(Some(selected))
            .await
            .unwrap();
        assert_eq!(names(&service.update_displayed().await.unwrap()), vec!["Up"]);

        service.set_selected_bin_transcripts(None).await.unwrap();
        assert_eq!(names(&service.update_displayed().await.unwrap()), vec!["Down"]);

        service.set_hovered_bin_transcripts(None).await.unwrap();
        assert_eq!(names(&service.update_displayed().await.unwrap()), vec!["Flat"]);
    }

    #[tokio::test]
    async fn test_displayed_follows_active_sort() {
        let service = loaded_service(TABLE, &["Up", "Down", "Flat"]).await;
        service
            .set_saved_transcripts(vec!["Up".to_string(), "Down".to_string(), "Flat".to_string()])
            .await
            .unwrap();

        service
            .update_sort(Some(SortPath::LogAta), Some(SortOrder::Desc))
            .await
            .unwrap();
        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(names(&displayed), vec!["Flat", "Up", "Down"]);

        // Omitted order keeps the previous Desc choice.
        service
            .update_sort(Some(SortPath::Name), None)
            .await
            .unwrap();
        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(names(&displayed), vec!["Up", "Flat", "Down"]);

        service
            .update_sort(None, Some(SortOrder::Asc))
            .await
            .unwrap();
        let displayed = service.update_displayed().await.unwrap();
        assert_eq!(names(&displayed), vec!["Down", "Flat", "Up"]);
    }

    #[tokio::test]
    async fn test_abundance_sort_puts_unmeasured_last() {
        let service = loaded_service(TABLE, &["Up", "Down", "Flat"]).await;

        // Flat has no WT abundance series at all.
        let sorted = service
            .update_sort(
                Some(SortPath::TreatmentAAbundanceMean),
                Some(SortOrder::Desc),
            )
            .await
            .unwrap();
        assert_eq!(names(&sorted), vec!["Up", "Down", "Flat"]);

        let sorted = service
            .update_sort(None, Some(SortOrder::Asc))
            .await
            .unwrap();
        assert_eq!(names(&sorted), vec!["Down", "Up", "Flat"]);
    }

    // =============================================================================
    // GENERATED TABLES
    // =============================================================================

    fn generated_table(rng: &mut StdRng, rows: usize) -> String {
        let mut table = String::from("id\tlogFC\tlogCPM\tPValue\n");
        for i in 0..rows {
            let fc: f64 = rng.gen_range(-8.0..8.0);
            let ata: f64 = rng.gen_range(0.0..15.0);
            let p: f64 = rng.gen_range(0.0001..1.0);
            table.push_str(&format!("g{i:03}\t{fc:.4}\t{ata:.4}\t{p:.6}\n"));
        }
        table
    }

    fn key(record: &TranscriptRecord, path: SortPath) -> f64 {
        match path {
            SortPath::PValue => record.p_value.unwrap(),
            SortPath::LogFc => record.log_fc.unwrap(),
            SortPath::LogAta => record.log_ata.unwrap(),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_generated_table_sorts_monotonically() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let table = generated_table(&mut rng, 200);
        let row_names: Vec<String> = (0..200).map(|i| format!("g{i:03}")).collect();
        let name_refs: Vec<&str> = row_names.iter().map(String::as_str).collect();
        let service = loaded_service(&table, &name_refs).await;

        for path in [SortPath::PValue, SortPath::LogFc, SortPath::LogAta] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let sorted = service.update_sort(Some(path), Some(order)).await.unwrap();
                assert_eq!(sorted.len(), 200);
                for pair in sorted.windows(2) {
                    let (x, y) = (key(&pair[0], path), key(&pair[1], path));
                    match order {
                        SortOrder::Asc => assert!(x <= y, "{path:?} asc broken: {x} > {y}"),
                        SortOrder::Desc => assert!(x >= y, "{path:?} desc broken: {x} < {y}"),
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_generated_brush_matches_manual_filter() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = generated_table(&mut rng, 100);
        let row_names: Vec<String> = (0..100).map(|i| format!("g{i:03}")).collect();
        let name_refs: Vec<&str> = row_names.iter().map(String::as_str).collect();
        let service = loaded_service(&table, &name_refs).await;

        let cmp = service.set_pairwise_comparison("WT", "KO").await.unwrap();
        service.set_p_value_threshold(0.5).await.unwrap();
        service
            .set_brushed_area(Some(BrushedArea::new(3.0, 12.0, -4.0, 4.0)))
            .await
            .unwrap();

        let displayed = service.update_displayed().await.unwrap();
        let expected = cmp
            .records
            .values()
            .filter(|r| {
                r.p_value.unwrap() <= 0.5
                    && (3.0..=12.0).contains(&r.log_ata.unwrap())
                    && (-4.0..=4.0).contains(&r.log_fc.unwrap())
            })
            .count();
        assert_eq!(displayed.len(), expected);
        assert!(expected > 0, "seed produced an empty brush, widen the region");
    }
}
