use anyhow::Result;
use email_predictor::app::{BatchUseCase, PredictUseCase};
use email_predictor::infra::dns::FixedDomainValidity;
use email_predictor::patterns::{generate, PatternKind};
use email_predictor::ranker::rank;
use email_predictor::storage::{export_csv, import_csv, PatternStore, SqlitePatternStore};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_train_then_predict_with_sqlite_store() -> Result<()> {
    let dir = tempdir()?;
    let training = dir.path().join("known.csv");
    std::fs::write(
        &training,
        "first_name,last_name,email\n\
         john,doe,john.doe@acme.com\n\
         Mary,Major,Mary.Major@ACME.com\n\
         ann,lee,alee@acme.com\n\
         ann,lee,nobody@acme.com\n\
         too,few\n",
    )?;

    let store = Arc::new(SqlitePatternStore::open(dir.path().join("patterns.db"))?);
    let summary = import_csv(store.as_ref(), &training).await?;
    assert_eq!(summary.recorded, 3);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.malformed, 1);
    assert_eq!(
        store.lookup("acme.com").await?,
        vec![(PatternKind::FirstDotLast, 2), (PatternKind::InitialLast, 1)]
    );

    let use_case = PredictUseCase::new(store.clone(), Arc::new(FixedDomainValidity(true)));
    let top = use_case.predict_top("Jane", "Smith", "acme.com", 3).await;
    assert_eq!(top[0].email, "jane.smith@acme.com");
    // first.last weighs 2, the eight other templates weigh 1 each
    assert!((top[0].confidence - 2.0 / 10.0 * 1.2).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_confidence_rises_with_evidence() -> Result<()> {
    let store = SqlitePatternStore::open_in_memory()?;
    let offline = FixedDomainValidity(false);
    let candidates = generate("Jane", "Smith", "example.com");

    let before = rank(&candidates, "example.com", &store, &offline).await;
    let dotted_before = before.iter().find(|r| r.email == "jane.smith@example.com").unwrap().confidence;
    assert!((dotted_before - 0.0556).abs() < 1e-4);

    for _ in 0..9 {
        store.record("example.com", PatternKind::FirstDotLast).await?;
    }
    let after = rank(&candidates, "example.com", &store, &offline).await;
    let dotted_after = after.iter().find(|r| r.email == "jane.smith@example.com").unwrap().confidence;
    assert!(dotted_after > dotted_before);
    assert!(after.iter().all(|r| (0.0..=0.95).contains(&r.confidence)));
    Ok(())
}

#[tokio::test]
async fn test_batch_and_export_round() -> Result<()> {
    let dir = tempdir()?;
    let store = Arc::new(SqlitePatternStore::open(dir.path().join("patterns.db"))?);
    for _ in 0..4 {
        store.record("corp.io", PatternKind::FirstUnderscoreLast).await?;
    }

    let contacts = dir.path().join("contacts.csv");
    let predictions = dir.path().join("predictions.csv");
    std::fs::write(&contacts, "first,last,domain\nAnn,Lee,corp.io\n")?;

    let batch = BatchUseCase::new(PredictUseCase::new(store.clone(), Arc::new(FixedDomainValidity(true))));
    let summary = batch.run(&contacts, &predictions).await?;
    assert_eq!(summary.predicted, 1);
    let output = std::fs::read_to_string(&predictions)?;
    assert!(output.contains("Ann,Lee,corp.io,ann_lee@corp.io,0.40"));

    let exported = dir.path().join("patterns.csv");
    assert_eq!(export_csv(store.as_ref(), &exported).await?, 1);
    assert_eq!(std::fs::read_to_string(&exported)?, "domain,pattern,count\ncorp.io,first_last,4\n");
    Ok(())
}
