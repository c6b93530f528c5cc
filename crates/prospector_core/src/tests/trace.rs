use super::*;

#[test]
fn test_record_size_matches_packed_layout() {
    assert_eq!(RECORD_SIZE, 1108);
}

#[test]
fn test_record_field_offsets() {
    let mut engine = test_engine(1);
    let result = engine.step(200);
    let record = TraceRecord::from_step(9, 200, &result);
    let bytes = record.encode();

    assert_eq!(&bytes[0..4], &9_u32.to_le_bytes());
    assert_eq!(bytes[4], 200);
    assert_eq!(&bytes[5..7], &1_u16.to_le_bytes());
    assert_eq!(&bytes[7..11], &result.reward.to_le_bytes());
    assert_eq!(&bytes[11..14], &[0, 0, 1]);
    assert_eq!(&bytes[14..16], &6_i16.to_le_bytes());
    assert_eq!(&bytes[16..20], &result.obs[0].to_le_bytes());
    let metrics_at = 16 + 260 * 4;
    assert_eq!(
        &bytes[metrics_at..metrics_at + 4],
        &result.metrics.credits.to_le_bytes()
    );
}

#[test]
fn test_decode_restores_record() {
    let records: Vec<TraceRecord> = random_rollout(4, 64)
        .iter()
        .enumerate()
        .map(|(t, result)| TraceRecord::from_step(u32::try_from(t).unwrap(), 0, result))
        .collect();
    let bytes: Vec<u8> = records.iter().flat_map(TraceRecord::encode).collect();
    assert_eq!(bytes.len(), records.len() * RECORD_SIZE);
    assert_eq!(decode_trace(&bytes).unwrap(), records);
}

#[test]
fn test_post_terminal_record_has_negative_action() {
    let mut engine = test_engine(1);
    engine.step(END_EPISODE);
    let record = TraceRecord::from_step(1, 6, &engine.step(HOLD));
    let decoded = TraceRecord::decode(&record.encode()).unwrap();
    assert_eq!(decoded.resolved_action, -1);
    assert_eq!(decoded.dt, 0);
    assert!(decoded.terminated && decoded.invalid_action);
}

#[test]
fn test_decode_errors() {
    let bytes = vec![0_u8; RECORD_SIZE + 3];
    assert_eq!(
        decode_trace(&bytes).unwrap_err(),
        TraceError::TrailingBytes {
            record_size: RECORD_SIZE,
            remainder: 3
        }
    );
    assert!(matches!(
        TraceRecord::decode(&bytes[..10]),
        Err(TraceError::Truncated {
            expected: RECORD_SIZE,
            actual: 10
        })
    ));
    assert!(decode_trace(&[]).unwrap().is_empty());
}
