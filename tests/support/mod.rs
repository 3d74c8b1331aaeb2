#![allow(dead_code, unused)]

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use fleetguide::avec::{Platform, PositionFix};

pub const SIGNATURE: u8 = 0x53;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A platform with a fixed clock, recording enrichment requests.
#[derive(Debug)]
pub struct Tracker {
    pub devices: HashMap<u32, u64>,
    pub transport: Option<u64>,
    pub now: DateTime<Utc>,
    pub enriched: Vec<PositionFix>,
}

impl Tracker {
    pub fn new() -> Self {
        init_logging();
        Self {
            devices: HashMap::from([(0xDEAD_BEEF, 7), (0x0102_0304, 11)]),
            transport: Some(42),
            now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            enriched: vec![],
        }
    }
}

impl Platform for Tracker {
    fn resolve_session_by_id(&mut self, id: u32) -> Option<u64> {
        self.devices.get(&id).copied()
    }

    fn resolve_session_by_transport(&mut self) -> Option<u64> {
        self.transport
    }

    fn enrich_last_known_location(&mut self, fix: &mut PositionFix) {
        self.enriched.push(fix.clone());
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Builder of frames around a payload.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    pub device_id: Option<u32>,
    pub subtype: Option<u8>,
    pub acknowledgement: Option<u16>,
    pub compressed: bool,
}

impl Frame {
    pub fn build(&self, payload: &[u8]) -> Vec<u8> {
        assert!(payload.len() < 1 << 11);

        let mut options = payload.len() as u16;
        options |= (self.device_id.is_some() as u16) << 11;
        options |= (self.subtype.is_some() as u16) << 12;
        options |= (self.acknowledgement.is_some() as u16) << 13;
        options |= (self.compressed as u16) << 14;

        let mut frame = vec![SIGNATURE];
        frame.extend(options.to_le_bytes());
        if let Some(id) = self.device_id {
            frame.extend(id.to_le_bytes());
        }
        if let Some(subtype) = self.subtype {
            frame.push(subtype);
        }
        if let Some(ack) = self.acknowledgement {
            frame.extend(ack.to_le_bytes());
        }
        frame.extend(payload);
        frame
    }
}

/// A plain frame with no optional header fields.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    Frame::default().build(payload)
}

pub fn record(kind: u8, body: &[u8]) -> Vec<u8> {
    let header = (u16::from(kind) << 10) | body.len() as u16;
    let mut record = header.to_le_bytes().to_vec();
    record.extend(body);
    record
}

pub fn timestamp(seconds: u32) -> Vec<u8> {
    record(0, &seconds.to_le_bytes())
}

pub fn location(latitude: u32, longitude: u32, speed: u16, course: u16, altitude: u16) -> Vec<u8> {
    let mut body = vec![];
    body.extend(latitude.to_le_bytes());
    body.extend(longitude.to_le_bytes());
    body.extend(speed.to_le_bytes());
    body.extend(course.to_le_bytes());
    body.extend(altitude.to_le_bytes());
    record(1, &body)
}

/// Pack the course word from its parts.
pub fn course(course: u16, motion: u16, satellites: u16) -> u16 {
    course | (motion << 9) | (satellites << 11)
}

pub fn device_time(seconds: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(1_262_304_000 + i64::from(seconds), 0).unwrap()
}

pub fn hex(s: &str) -> Vec<u8> {
    let s: String = s.split_whitespace().collect();
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}
