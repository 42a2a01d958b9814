// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Wire Shape
//!
//! The JSON form in which stays are loaded and persisted. Instants are
//! RFC 3339 strings; the vessel field `len` is accepted as a legacy alias of
//! `lpp`. A `status` is written only for records that carry one.

use crate::{
    err::StayBuildError,
    id::{StayId, VesselId},
    stay::{Docking, Schedule, Stay, StayStatus, Vessel},
};
use chrono::{DateTime, Utc};
use quay_plan_core::{
    space::{Heading, PierLength, PierPosition},
    time::TimePoint,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    pub vessel_id: u64,
    pub vessel_name: String,
    #[serde(alias = "len")]
    pub lpp: f64,
    pub beam: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockingRecord {
    pub dir: i64,
    pub pos: f64,
    #[serde(default)]
    pub aft: f64,
    #[serde(default)]
    pub rear: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub etb: DateTime<Utc>,
    pub etd: DateTime<Utc>,
    #[serde(default)]
    pub atb: Option<DateTime<Utc>>,
    #[serde(default)]
    pub atd: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayRecord {
    pub stay_id: u64,
    pub vessel: VesselRecord,
    pub docking: DockingRecord,
    pub schedule: ScheduleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StayStatus>,
}

#[derive(Debug)]
pub enum WireError {
    Json(serde_json::Error),
    InvalidStay { stay_id: u64, source: StayBuildError },
    TimeOutOfRange { stay_id: u64, value: TimePoint },
}

impl Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::Json(e) => write!(f, "Malformed stay JSON: {}", e),
            WireError::InvalidStay { stay_id, source } => {
                write!(f, "Stay {} is invalid: {}", stay_id, source)
            }
            WireError::TimeOutOfRange { stay_id, value } => {
                write!(
                    f,
                    "Stay {} has an instant outside the calendar range: {}",
                    stay_id, value
                )
            }
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Json(e) => Some(e),
            WireError::InvalidStay { source, .. } => Some(source),
            WireError::TimeOutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(err: serde_json::Error) -> Self {
        WireError::Json(err)
    }
}

impl TryFrom<StayRecord> for Stay {
    type Error = WireError;

    fn try_from(rec: StayRecord) -> Result<Self, Self::Error> {
        let stay_id = rec.stay_id;
        let build = || -> Result<Stay, StayBuildError> {
            let vessel = Vessel::new(
                VesselId::new(rec.vessel.vessel_id),
                rec.vessel.vessel_name,
                PierLength::new(rec.vessel.lpp),
                PierLength::new(rec.vessel.beam),
            )?;
            let docking = Docking::new(
                Heading::try_from(rec.docking.dir)?,
                PierPosition::new(rec.docking.pos),
                PierLength::new(rec.docking.aft),
                PierLength::new(rec.docking.rear),
            )?;
            let schedule = Schedule::new(
                rec.schedule.etb.into(),
                rec.schedule.etd.into(),
                rec.schedule.atb.map(TimePoint::from),
                rec.schedule.atd.map(TimePoint::from),
            )?;
            Ok(Stay::new(StayId::new(stay_id), vessel, docking, schedule)
                .with_status(rec.status.unwrap_or_default()))
        };
        build().map_err(|source| WireError::InvalidStay { stay_id, source })
    }
}

impl TryFrom<&Stay> for StayRecord {
    type Error = WireError;

    fn try_from(stay: &Stay) -> Result<Self, Self::Error> {
        let stay_id = stay.id().value();
        let instant = |t: TimePoint| {
            t.to_datetime()
                .ok_or(WireError::TimeOutOfRange { stay_id, value: t })
        };
        let schedule = stay.schedule();
        let status = stay.status();
        Ok(StayRecord {
            stay_id,
            vessel: VesselRecord {
                vessel_id: stay.vessel().id().value(),
                vessel_name: stay.vessel().name().to_owned(),
                lpp: stay.vessel().lpp().value(),
                beam: stay.vessel().beam().value(),
            },
            docking: DockingRecord {
                dir: stay.docking().heading().into(),
                pos: stay.docking().pos().value(),
                aft: stay.docking().aft().value(),
                rear: stay.docking().rear().value(),
            },
            schedule: ScheduleRecord {
                etb: instant(schedule.etb())?,
                etd: instant(schedule.etd())?,
                atb: schedule.atb().map(instant).transpose()?,
                atd: schedule.atd().map(instant).transpose()?,
            },
            status: (!status.is_unset()).then_some(status),
        })
    }
}

/// Converts wire records to stays, failing on the first invalid record.
pub fn decode_records(records: Vec<StayRecord>) -> Result<Vec<Stay>, WireError> {
    records.into_iter().map(Stay::try_from).collect()
}

pub fn encode_records<'a, I>(stays: I) -> Result<Vec<StayRecord>, WireError>
where
    I: IntoIterator<Item = &'a Stay>,
{
    stays.into_iter().map(StayRecord::try_from).collect()
}

/// Parses a JSON array of stays.
pub fn parse_stays(json: &str) -> Result<Vec<Stay>, WireError> {
    let records: Vec<StayRecord> = serde_json::from_str(json)?;
    decode_records(records)
}

/// Renders stays as a pretty-printed JSON array.
pub fn to_json<'a, I>(stays: I) -> Result<String, WireError>
where
    I: IntoIterator<Item = &'a Stay>,
{
    let records = encode_records(stays)?;
    Ok(serde_json::to_string_pretty(&records)?)
}
