//! Typed field encoding for structured records
//!
//! Every value attached to a record goes through [`FieldValue`]: one variant
//! per supported encoding, one `From` impl per concrete input type. Dispatch
//! is exact: the trait system picks the most specific conversion and nothing
//! is coerced. Values with no typed conversion go through
//! [`FieldValue::serialize`], which falls back to a structural JSON encoding
//! and never aborts the record (a failing field is dropped, see
//! [`FieldValue::serialize`]).

use chrono::{DateTime, Local, SecondsFormat, Utc};
use ipnet::IpNet;
use macaddr::MacAddr6;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    StrSeq(Vec<String>),
    Bool(bool),
    BoolSeq(Vec<bool>),
    Int(i64),
    IntSeq(Vec<i64>),
    Uint(u64),
    UintSeq(Vec<u64>),
    Float(f64),
    FloatSeq(Vec<f64>),
    /// Raw bytes, rendered as a hex string so they stay distinct from
    /// integer sequences.
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
    TimeSeq(Vec<DateTime<Utc>>),
    /// Durations carry their unit ("1s 500ms"), they are not bare numbers.
    Duration(Duration),
    DurationSeq(Vec<Duration>),
    Addr(IpAddr),
    Net(IpNet),
    Mac(MacAddr6),
    /// Structural fallback for values outside the typed table.
    Any(serde_json::Value),
}

impl FieldValue {
    /// Encode an error as its message string.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        FieldValue::Str(err.to_string())
    }

    /// Encode a slice of errors as their message strings, in order.
    pub fn errors<E: std::error::Error>(errs: &[E]) -> Self {
        FieldValue::StrSeq(errs.iter().map(|e| e.to_string()).collect())
    }

    /// Encode anything with a string conversion via that conversion.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        FieldValue::Str(value.to_string())
    }

    /// Structural fallback: encode an arbitrary serializable value.
    ///
    /// Returns `None` when the value cannot be serialized; callers drop the
    /// field and keep the rest of the record.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Option<Self> {
        serde_json::to_value(value).ok().map(FieldValue::Any)
    }

    /// Convert to a `serde_json::Value` for the file sink's serializer.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::StrSeq(seq) => seq.iter().cloned().map(Value::String).collect(),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::BoolSeq(seq) => seq.iter().copied().map(Value::Bool).collect(),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::IntSeq(seq) => seq.iter().map(|i| Value::Number((*i).into())).collect(),
            FieldValue::Uint(u) => Value::Number((*u).into()),
            FieldValue::UintSeq(seq) => seq.iter().map(|u| Value::Number((*u).into())).collect(),
            FieldValue::Float(f) => float_json(*f),
            FieldValue::FloatSeq(seq) => seq.iter().map(|f| float_json(*f)).collect(),
            FieldValue::Bytes(bytes) => Value::String(hex_string(bytes)),
            FieldValue::Time(t) => Value::String(format_time(t)),
            FieldValue::TimeSeq(seq) => {
                seq.iter().map(|t| Value::String(format_time(t))).collect()
            }
            FieldValue::Duration(d) => Value::String(format_dur(d)),
            FieldValue::DurationSeq(seq) => {
                seq.iter().map(|d| Value::String(format_dur(d))).collect()
            }
            FieldValue::Addr(addr) => Value::String(addr.to_string()),
            FieldValue::Net(net) => Value::String(net.to_string()),
            FieldValue::Mac(mac) => Value::String(mac.to_string()),
            FieldValue::Any(value) => value.clone(),
        }
    }
}

fn float_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_dur(d: &Duration) -> String {
    humantime::format_duration(*d).to_string()
}

fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "]")
        }

        match self {
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::StrSeq(v) => seq(f, v),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::BoolSeq(v) => seq(f, v),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::IntSeq(v) => seq(f, v),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::UintSeq(v) => seq(f, v),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::FloatSeq(v) => seq(f, v),
            FieldValue::Bytes(b) => write!(f, "{}", hex_string(b)),
            FieldValue::Time(t) => write!(f, "{}", format_time(t)),
            FieldValue::TimeSeq(v) => {
                let rendered: Vec<String> = v.iter().map(format_time).collect();
                seq(f, &rendered)
            }
            FieldValue::Duration(d) => write!(f, "{}", format_dur(d)),
            FieldValue::DurationSeq(v) => {
                let rendered: Vec<String> = v.iter().map(format_dur).collect();
                seq(f, &rendered)
            }
            FieldValue::Addr(a) => write!(f, "{}", a),
            FieldValue::Net(n) => write!(f, "{}", n),
            FieldValue::Mac(m) => write!(f, "{}", m),
            FieldValue::Any(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(seq: Vec<String>) -> Self {
        FieldValue::StrSeq(seq)
    }
}

impl From<&[&str]> for FieldValue {
    fn from(seq: &[&str]) -> Self {
        FieldValue::StrSeq(seq.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(seq: Vec<&str>) -> Self {
        FieldValue::StrSeq(seq.into_iter().map(String::from).collect())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<bool>> for FieldValue {
    fn from(seq: Vec<bool>) -> Self {
        FieldValue::BoolSeq(seq)
    }
}

macro_rules! int_from {
    ($($ty:ty),+) => {$(
        impl From<$ty> for FieldValue {
            fn from(i: $ty) -> Self {
                FieldValue::Int(i64::from(i))
            }
        }

        impl From<Vec<$ty>> for FieldValue {
            fn from(seq: Vec<$ty>) -> Self {
                FieldValue::IntSeq(seq.into_iter().map(i64::from).collect())
            }
        }
    )+};
}

macro_rules! uint_from {
    ($($ty:ty),+) => {$(
        impl From<$ty> for FieldValue {
            fn from(u: $ty) -> Self {
                FieldValue::Uint(u64::from(u))
            }
        }

        impl From<Vec<$ty>> for FieldValue {
            fn from(seq: Vec<$ty>) -> Self {
                FieldValue::UintSeq(seq.into_iter().map(u64::from).collect())
            }
        }
    )+};
}

int_from!(i8, i16, i32, i64);
uint_from!(u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<Vec<isize>> for FieldValue {
    fn from(seq: Vec<isize>) -> Self {
        FieldValue::IntSeq(seq.into_iter().map(|i| i as i64).collect())
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<Vec<usize>> for FieldValue {
    fn from(seq: Vec<usize>) -> Self {
        FieldValue::UintSeq(seq.into_iter().map(|u| u as u64).collect())
    }
}

impl From<u8> for FieldValue {
    fn from(u: u8) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

// Vec<u8> is bytes, not an unsigned-integer sequence.
impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        FieldValue::Bytes(bytes)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(bytes: &[u8]) -> Self {
        FieldValue::Bytes(bytes.to_vec())
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<Vec<f32>> for FieldValue {
    fn from(seq: Vec<f32>) -> Self {
        FieldValue::FloatSeq(seq.into_iter().map(f64::from).collect())
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(seq: Vec<f64>) -> Self {
        FieldValue::FloatSeq(seq)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Time(t)
    }
}

impl From<DateTime<Local>> for FieldValue {
    fn from(t: DateTime<Local>) -> Self {
        FieldValue::Time(t.with_timezone(&Utc))
    }
}

impl From<Vec<DateTime<Utc>>> for FieldValue {
    fn from(seq: Vec<DateTime<Utc>>) -> Self {
        FieldValue::TimeSeq(seq)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl From<Vec<Duration>> for FieldValue {
    fn from(seq: Vec<Duration>) -> Self {
        FieldValue::DurationSeq(seq)
    }
}

impl From<IpAddr> for FieldValue {
    fn from(addr: IpAddr) -> Self {
        FieldValue::Addr(addr)
    }
}

impl From<Ipv4Addr> for FieldValue {
    fn from(addr: Ipv4Addr) -> Self {
        FieldValue::Addr(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for FieldValue {
    fn from(addr: Ipv6Addr) -> Self {
        FieldValue::Addr(IpAddr::V6(addr))
    }
}

impl From<IpNet> for FieldValue {
    fn from(net: IpNet) -> Self {
        FieldValue::Net(net)
    }
}

impl From<MacAddr6> for FieldValue {
    fn from(mac: MacAddr6) -> Self {
        FieldValue::Mac(mac)
    }
}
