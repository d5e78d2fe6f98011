//! Versioned binary encoding of licenses, features and sealed key pairs.
//!
//! Every buffer starts with a header naming what it holds:
//!
//! ```text
//! magic "LCNS" (4) | format version (1) | type tag (1) | body
//! ```
//!
//! Body integers are big-endian. Strings and byte blobs are `u32`
//! length-prefixed; instants are `i64` seconds since the Unix epoch plus
//! `u32` nanoseconds; an optional instant is a `0`/`1` flag byte followed
//! by the instant when present.
//!
//! Decoding either yields a complete value or an error: a buffer for a
//! different entity is [`LicenseError::TypeMismatch`], anything else that
//! does not parse (truncation, trailing bytes, unknown version, duplicate
//! features) is [`LicenseError::Malformed`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{LicenseError, LicenseResult};
use crate::feature::Feature;
use crate::key::KeyAlgorithm;
use crate::key_pair_service::EncryptedKeyPair;
use crate::license::License;

/// Leading bytes of every encoded buffer.
pub const MAGIC: [u8; 4] = *b"LCNS";

/// The format version written by [`encode`].
pub const FORMAT_VERSION: u8 = 1;

/// Which entity an encoded buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    License,
    Feature,
    KeyPair,
}

impl TypeTag {
    const fn code(self) -> u8 {
        match self {
            Self::License => 1,
            Self::Feature => 2,
            Self::KeyPair => 3,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::License),
            2 => Some(Self::Feature),
            3 => Some(Self::KeyPair),
            _ => None,
        }
    }

    /// Human-readable entity name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::License => "License",
            Self::Feature => "Feature",
            Self::KeyPair => "EncryptedKeyPair",
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::feature::Feature {}
    impl Sealed for crate::license::License {}
    impl Sealed for crate::key_pair_service::EncryptedKeyPair {}
}

/// An entity with a binary body layout.
///
/// Sealed: the entity set is fixed by [`TypeTag`], so only this crate's
/// types implement it.
pub trait Encodable: sealed::Sealed + Sized {
    /// The tag written into, and required from, the header.
    const TAG: TypeTag;

    fn encode_body(&self, out: &mut Writer) -> LicenseResult<()>;

    fn decode_body(input: &mut Reader<'_>) -> LicenseResult<Self>;
}

/// Encodes `value` with a header for the current format version.
pub fn encode<T: Encodable>(value: &T) -> LicenseResult<Vec<u8>> {
    let mut out = Writer::default();
    out.raw(&MAGIC);
    out.u8(FORMAT_VERSION);
    out.u8(T::TAG.code());
    value.encode_body(&mut out)?;
    Ok(out.into_bytes())
}

/// Decodes a `T` written in format `expected_version`.
///
/// # Errors
///
/// [`LicenseError::TypeMismatch`] if the header names another entity;
/// [`LicenseError::Malformed`] for every other defect. No partially
/// decoded value is ever returned.
pub fn decode<T: Encodable>(bytes: &[u8], expected_version: u8) -> LicenseResult<T> {
    decode_inner(bytes, expected_version).inspect_err(|e| {
        debug!(expected = T::TAG.name(), len = bytes.len(), error = %e, "decode failed");
    })
}

fn decode_inner<T: Encodable>(bytes: &[u8], expected_version: u8) -> LicenseResult<T> {
    if expected_version != FORMAT_VERSION {
        return Err(LicenseError::Malformed(format!(
            "format version {expected_version} is not readable by this build"
        )));
    }

    let mut input = Reader::new(bytes);
    if input.take(MAGIC.len())? != MAGIC {
        return Err(LicenseError::Malformed("missing LCNS header".to_string()));
    }

    let version = input.u8()?;
    if version != expected_version {
        return Err(LicenseError::Malformed(format!(
            "format version {version} does not match expected version {expected_version}"
        )));
    }

    let code = input.u8()?;
    let found = TypeTag::from_code(code)
        .ok_or_else(|| LicenseError::Malformed(format!("unknown type tag {code}")))?;
    if found != T::TAG {
        return Err(LicenseError::TypeMismatch {
            expected: T::TAG.name(),
            found: found.name(),
        });
    }

    let value = T::decode_body(&mut input)?;
    input.finish()?;
    Ok(value)
}

/// Encodes a license in the current format version.
pub fn encode_license(license: &License) -> LicenseResult<Vec<u8>> {
    encode(license)
}

/// Decodes a license written in the current format version.
pub fn decode_license(bytes: &[u8]) -> LicenseResult<License> {
    decode(bytes, FORMAT_VERSION)
}

impl Encodable for Feature {
    const TAG: TypeTag = TypeTag::Feature;

    fn encode_body(&self, out: &mut Writer) -> LicenseResult<()> {
        out.string(self.name())?;
        out.u32(self.seats());
        out.optional_instant(self.good_before().as_ref());
        Ok(())
    }

    fn decode_body(input: &mut Reader<'_>) -> LicenseResult<Self> {
        let name = input.string()?;
        let seats = input.u32()?;
        let builder = Feature::of(name).seats(seats);
        Ok(match input.optional_instant()? {
            Some(good_before) => builder.good_before(good_before).build(),
            None => builder.build(),
        })
    }
}

impl Encodable for License {
    const TAG: TypeTag = TypeTag::License;

    fn encode_body(&self, out: &mut Writer) -> LicenseResult<()> {
        out.string(self.product_key())?;
        out.string(self.holder())?;
        out.string(self.issuer())?;
        out.string(self.subject())?;
        out.instant(&self.issue_date());
        out.instant(&self.good_after());
        out.instant(&self.good_before());
        out.u32(self.seats());
        out.count(self.features().len())?;
        for feature in self.features() {
            feature.encode_body(out)?;
        }
        Ok(())
    }

    fn decode_body(input: &mut Reader<'_>) -> LicenseResult<Self> {
        let product_key = input.string()?;
        let holder = input.string()?;
        let issuer = input.string()?;
        let subject = input.string()?;
        let issue_date = input.instant()?;
        let good_after = input.instant()?;
        let good_before = input.instant()?;
        let seats = input.u32()?;

        let count = input.u32()?;
        let mut features: Vec<Feature> = Vec::new();
        let mut seen: HashSet<Feature> = HashSet::new();
        for _ in 0..count {
            let feature = Feature::decode_body(input)?;
            if !seen.insert(feature.clone()) {
                return Err(LicenseError::Malformed(format!(
                    "duplicate feature {:?}",
                    feature.name()
                )));
            }
            features.push(feature);
        }

        Ok(License::builder()
            .product_key(product_key)
            .holder(holder)
            .issuer(issuer)
            .subject(subject)
            .issue_date(issue_date)
            .good_after(good_after)
            .good_before(good_before)
            .seats(seats)
            .features(features)
            .build())
    }
}

impl Encodable for EncryptedKeyPair {
    const TAG: TypeTag = TypeTag::KeyPair;

    fn encode_body(&self, out: &mut Writer) -> LicenseResult<()> {
        out.string(self.algorithm.name())?;
        out.bytes(self.private_key.as_bytes())?;
        out.bytes(self.public_key.as_bytes())?;
        Ok(())
    }

    fn decode_body(input: &mut Reader<'_>) -> LicenseResult<Self> {
        let algorithm: KeyAlgorithm = input.string()?.parse()?;
        let private_key = input.bytes()?.to_vec().into();
        let public_key = input.bytes()?.to_vec().into();
        Ok(Self {
            algorithm,
            private_key,
            public_key,
        })
    }
}

/// Append-only body writer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn u32(&mut self, value: u32) {
        self.raw(&value.to_be_bytes());
    }

    pub fn i64(&mut self, value: i64) {
        self.raw(&value.to_be_bytes());
    }

    /// Writes a collection length as `u32`.
    pub fn count(&mut self, len: usize) -> LicenseResult<()> {
        let len = u32::try_from(len).map_err(|_| {
            LicenseError::Serialization(format!("length {len} exceeds u32::MAX"))
        })?;
        self.u32(len);
        Ok(())
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> LicenseResult<()> {
        self.count(bytes.len())?;
        self.raw(bytes);
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> LicenseResult<()> {
        self.bytes(value.as_bytes())
    }

    pub fn instant(&mut self, instant: &DateTime<Utc>) {
        self.i64(instant.timestamp());
        self.u32(instant.timestamp_subsec_nanos());
    }

    pub fn optional_instant(&mut self, instant: Option<&DateTime<Utc>>) {
        match instant {
            Some(instant) => {
                self.u8(1);
                self.instant(instant);
            }
            None => self.u8(0),
        }
    }
}

/// Bounds-checked body reader.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> LicenseResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(LicenseError::Malformed(format!(
                "truncated: needed {len} bytes at offset {}, {} remaining",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> LicenseResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn finish(&self) -> LicenseResult<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(LicenseError::Malformed(format!("{extra} trailing bytes after value"))),
        }
    }

    pub fn u8(&mut self) -> LicenseResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u32(&mut self) -> LicenseResult<u32> {
        self.array().map(u32::from_be_bytes)
    }

    pub fn i64(&mut self) -> LicenseResult<i64> {
        self.array().map(i64::from_be_bytes)
    }

    pub fn bytes(&mut self) -> LicenseResult<&'a [u8]> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    pub fn string(&mut self) -> LicenseResult<String> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LicenseError::Malformed(format!("invalid UTF-8 in string: {e}")))
    }

    pub fn instant(&mut self) -> LicenseResult<DateTime<Utc>> {
        let secs = self.i64()?;
        let nanos = self.u32()?;
        DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
            LicenseError::Malformed(format!("instant out of range: {secs}s {nanos}ns"))
        })
    }

    pub fn optional_instant(&mut self) -> LicenseResult<Option<DateTime<Utc>>> {
        match self.u8()? {
            0 => Ok(None),
            1 => self.instant().map(Some),
            flag => Err(LicenseError::Malformed(format!("invalid presence flag {flag}"))),
        }
    }
}
