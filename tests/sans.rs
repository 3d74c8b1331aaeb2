use either::Either::{Left, Right};
use fleetguide::sans::{
    Decoder,
    fix::Segmenter,
    header::{Extension, FrameOptions},
    record::{AnyRecord, DEVICE_EPOCH, LOCATION, TIMESTAMP},
};

#[test]
fn header_states_follow_flags() {
    let (options, successor) = Decoder::advance([0x53, 0x2A, 0x78]);

    assert_eq!(
        options,
        FrameOptions {
            signature: 0x53,
            length: 0x02A,
            has_device_id: true,
            has_subtype: true,
            has_acknowledgement: true,
            is_compressed: true,
        }
    );

    let Left(state) = successor else {
        panic!("expected device identifier state");
    };
    let (id, extension) = state.advance([0x78, 0x56, 0x34, 0x12]);
    assert_eq!(id, 0x1234_5678);

    let Extension::Subtype(state) = extension else {
        panic!("expected subtype state");
    };
    let (subtype, successor) = state.advance([0xA5]);
    assert_eq!(subtype, 0x05);

    let Left(state) = successor else {
        panic!("expected acknowledgement state");
    };
    let (ack, payload) = state.advance([0xEF, 0xBE]);
    assert_eq!(ack, 0xBEEF);
    assert_eq!(payload.len(), 0x02A);
    assert!(payload.is_compressed());
}

#[test]
fn header_without_flags_goes_to_payload() {
    let (options, successor) = Decoder::advance([0x00, 0xFF, 0x07]);

    assert_eq!(options.length, 0x7FF);
    assert!(!options.has_device_id && !options.is_compressed);
    assert!(matches!(successor, Right(Extension::Payload(_))));

    let (_, successor) = Decoder::advance([0x00, 0x00, 0x20]);
    assert!(matches!(successor, Right(Extension::Acknowledgement(_))));
}

#[test]
fn record_states() {
    let (_, successor) = Decoder::advance([0x00, 0x00, 0x00]);
    let Right(Extension::Payload(payload)) = successor else {
        panic!("expected payload state");
    };
    let record_header = payload.advance();

    let (kind, length, successor) = record_header.advance([0x06, 0x00]);
    assert_eq!((kind, length), (TIMESTAMP, 6));

    let AnyRecord::Timestamp(state) = successor else {
        panic!("expected timestamp state");
    };
    let (time, skip) = state.advance([0x01, 0x00, 0x00, 0x00]);
    assert_eq!(time.unwrap().timestamp(), DEVICE_EPOCH + 1);
    assert_eq!(skip.len(), 2);

    let (kind, length, successor) = skip.advance().advance([0x02, 0x04]);
    assert_eq!((kind, length), (LOCATION, 2));
    assert!(matches!(successor, AnyRecord::Skip(ref s) if s.len() == 2));

    let AnyRecord::Skip(skip) = successor else {
        unreachable!();
    };
    let (kind, length, successor) = skip.advance().advance([0xFF, 0xFF]);
    assert_eq!((kind, length), (63, 1023));
    assert!(matches!(successor, AnyRecord::Skip(_)));
}

#[test]
fn segmenter_splits_on_repeat() {
    let mut segmenter = Segmenter::new(5);

    assert!(segmenter.begin(TIMESTAMP).is_none());
    assert!(segmenter.begin(63).is_none());
    assert!(segmenter.begin(LOCATION).is_none());

    let fix = segmenter.begin(63).unwrap();
    assert_eq!(fix.device_id, 5);

    assert!(segmenter.begin(TIMESTAMP).is_none());
    assert_eq!(segmenter.finish().unwrap().device_id, 5);

    assert!(Segmenter::new(5).finish().is_none());
}

#[test]
fn location_speed_in_knots() {
    let (_, successor) = Decoder::advance([0x00, 0x00, 0x00]);
    let Right(Extension::Payload(payload)) = successor else {
        panic!("expected payload state");
    };

    let (kind, length, successor) = payload.advance().advance([0x0E, 0x04]);
    assert_eq!((kind, length), (LOCATION, 14));

    let AnyRecord::Location(state) = successor else {
        panic!("expected location state");
    };

    // 185.2 km/h, with both coordinate sign bits clear.
    let mut body = [0; 14];
    body[8..10].copy_from_slice(&1852u16.to_le_bytes());
    body[10..12].copy_from_slice(&((3u16 << 11) | (1 << 9) | 90).to_le_bytes());

    let (location, skip) = state.advance(body);
    assert!((location.speed - 100.0).abs() < 1e-9);
    assert_eq!(location.course, 90);
    assert_eq!(location.motion, Some(false));
    assert_eq!(location.satellites, 3);
    assert!(skip.is_empty());
}
