use icd_data::errors::LookupError;
use icd_data::pool::{CandidatePool, Content, ContentField, ContentLookup, PoolItem};
use icd_data::records::{read_records, write_records, IcdSequenceRecord};
use icd_data::simulate::random_multimodal_pool;

#[test]
fn content_lookup_resolves_configured_fields() -> anyhow::Result<()> {
    let pool = random_multimodal_pool(3);

    match pool.content_at(1, ContentField::Text)? {
        Content::Text(text) => assert!(text.contains("item 1")),
        other => panic!("expected text content, got {:?}", other),
    }

    match pool.content_at(2, ContentField::Image)? {
        Content::Image(path) => assert!(path.ends_with(".jpg")),
        other => panic!("expected image content, got {:?}", other),
    }

    Ok(())
}

#[test]
fn missing_field_and_out_of_range_are_typed_errors() {
    let pool = CandidatePool::new(vec![PoolItem {
        source_id: Some(0),
        text: Some("only text".into()),
        image: None,
    }]);

    assert_eq!(
        pool.content_at(0, ContentField::Image).unwrap_err(),
        LookupError::MissingField {
            id: 0,
            field: ContentField::Image
        }
    );

    assert_eq!(
        pool.content_at(7, ContentField::Text).unwrap_err(),
        LookupError::IdOutOfRange { id: 7, size: 1 }
    );
}

#[test]
fn pool_loads_sorted_by_source_id() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("pool.jsonl");
    let file = file.to_str().unwrap();

    let shuffled = CandidatePool::new(vec![
        PoolItem {
            source_id: Some(42),
            text: Some("late".into()),
            image: None,
        },
        PoolItem {
            source_id: Some(7),
            text: Some("early".into()),
            image: None,
        },
    ]);
    shuffled.write_json(file)?;

    let pool = CandidatePool::read_json(file)?;
    assert_eq!(pool.get(0).unwrap().text.as_deref(), Some("early"));
    assert_eq!(pool.get(1).unwrap().text.as_deref(), Some("late"));

    Ok(())
}

#[test]
fn records_round_trip_through_json_lines() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("records.jsonl.gz");
    let file = file.to_str().unwrap();

    let records = vec![
        IcdSequenceRecord {
            demonstrations: vec![4, 2, 9],
            query_id: 17,
        },
        IcdSequenceRecord {
            demonstrations: vec![],
            query_id: 3,
        },
    ];

    write_records(&records, file)?;
    assert_eq!(read_records(file)?, records);

    Ok(())
}

#[test]
fn record_requires_a_terminal_query_id() {
    assert!(IcdSequenceRecord::from_id_list(&[]).is_err());

    let record = IcdSequenceRecord::from_id_list(&[1, 2, 3]).unwrap();
    assert_eq!(record.demonstrations, vec![1, 2]);
    assert_eq!(record.query_id, 3);
    assert_eq!(record.shot_num(), 2);
}
