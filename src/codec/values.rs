// Wire encoders and decoders for the scalar and structured value kinds

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::bits::{BitReader, BitWriter};
use crate::error::{BinaryError, Result};
use crate::types::timepoint::{date_from_mjd, mjd_from_date};
use crate::types::{Bearer, ContentId, EnsembleId, Genre, GenreScheme, ServiceId, Timepoint};

/// Encode an unsigned integer at its declared bit width. The width has
/// to describe whole wire bytes, since the decoder recovers it from the
/// payload length.
pub fn encode_integer(value: u64, width: u32) -> Result<Vec<u8>> {
    if width == 0 || width > 64 || width % 8 != 0 {
        return Err(BinaryError::Overflow { value, width });
    }
    let mut writer = BitWriter::new();
    writer.write(value, width as usize)?;
    Ok(writer.into_bytes())
}

pub fn decode_integer(payload: &[u8]) -> Result<u64> {
    if payload.is_empty() {
        return Err(BinaryError::TruncatedInput {
            needed: 8,
            available: 0,
        });
    }
    if payload.len() > 8 {
        return Err(BinaryError::LengthExceeded {
            length: payload.len(),
        });
    }
    BitReader::new(payload).read(payload.len() * 8)
}

/// Durations are an unsigned 16-bit seconds count.
pub fn encode_duration(seconds: u16) -> Vec<u8> {
    seconds.to_be_bytes().to_vec()
}

pub fn decode_duration(payload: &[u8]) -> Result<u16> {
    Ok(BitReader::new(payload).read(16)? as u16)
}

/// Timepoint wire layout:
/// `rfa(1) mjd(17) rfa(1) lto_flag(1) long_form(1)` followed by
/// `hour(5) minute(6) second(6) rfa(10)` in the long form or
/// `hour(5) minute(6)` in the short form, then
/// `rfa(2) sign(1) half_hours(5)` when the LTO flag is set. The long
/// form is selected exactly when the seconds component is nonzero; an
/// all-zero payload is the "unspecified" sentinel.
pub fn encode_timepoint(timepoint: &Timepoint) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    match timepoint {
        Timepoint::Unspecified => {
            writer.write(0, 32)?;
        }
        Timepoint::At {
            datetime,
            offset_half_hours,
        } => {
            writer.write_bool(false);
            writer.write(mjd_from_date(datetime.date()) as u64, 17)?;
            writer.write_bool(false);
            writer.write_bool(offset_half_hours.is_some());
            let long_form = datetime.second() != 0;
            writer.write_bool(long_form);
            writer.write(u64::from(datetime.hour()), 5)?;
            writer.write(u64::from(datetime.minute()), 6)?;
            if long_form {
                writer.write(u64::from(datetime.second()), 6)?;
                writer.write(0, 10)?;
            }
            if let Some(half_hours) = offset_half_hours {
                writer.write(0, 2)?;
                writer.write_bool(*half_hours < 0);
                writer.write(u64::from(half_hours.unsigned_abs()), 5)?;
            }
        }
    }
    Ok(writer.into_bytes())
}

pub fn decode_timepoint(payload: &[u8]) -> Result<Timepoint> {
    if payload.iter().all(|b| *b == 0) {
        return Ok(Timepoint::Unspecified);
    }
    let mut reader = BitReader::new(payload);
    reader.read(1)?;
    let mjd = reader.read(17)? as i64;
    reader.read(1)?;
    let lto_flag = reader.read_bool()?;
    let long_form = reader.read_bool()?;
    let hour = reader.read(5)? as u8;
    let minute = reader.read(6)? as u8;
    let second = if long_form {
        let second = reader.read(6)? as u8;
        reader.read(10)?;
        second
    } else {
        0
    };
    let offset_half_hours = if lto_flag {
        reader.read(2)?;
        let negative = reader.read_bool()?;
        let half_hours = reader.read(5)? as i8;
        Some(if negative { -half_hours } else { half_hours })
    } else {
        None
    };
    let out_of_range = || BinaryError::InvalidTimepoint {
        mjd,
        hour,
        minute,
        second,
    };
    let date = date_from_mjd(mjd).ok_or_else(out_of_range)?;
    let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
        .ok_or_else(out_of_range)?;
    Ok(Timepoint::At {
        datetime: NaiveDateTime::new(date, time),
        offset_half_hours,
    })
}

/// ContentId wire layout. The ensemble-only shape is exactly three
/// bytes (`ecc(8) eid(16)`); every other length is the general shape
/// `rfa(1) ensemble_flag(1) xpad_flag(1) sid_size(1) scids(4)
/// [ecc(8) eid(16)] sid(16|32) [rfa(3) xpad(5)]`. The selector is the
/// total payload length, not a discriminator bit.
pub fn encode_contentid(id: &ContentId) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    match id {
        ContentId::Ensemble(EnsembleId { ecc, eid }) => {
            writer.write(u64::from(*ecc), 8)?;
            writer.write(u64::from(*eid), 16)?;
        }
        ContentId::Service {
            ensemble,
            sid,
            scids,
            xpad,
        } => {
            writer.write_bool(false);
            writer.write_bool(ensemble.is_some());
            writer.write_bool(xpad.is_some());
            writer.write_bool(matches!(sid, ServiceId::Data(_)));
            writer.write(u64::from(*scids), 4)?;
            if let Some(EnsembleId { ecc, eid }) = ensemble {
                writer.write(u64::from(*ecc), 8)?;
                writer.write(u64::from(*eid), 16)?;
            }
            match sid {
                ServiceId::Audio(sid) => writer.write(u64::from(*sid), 16)?,
                ServiceId::Data(sid) => writer.write(u64::from(*sid), 32)?,
            }
            if let Some(xpad) = xpad {
                writer.write(0, 3)?;
                writer.write(u64::from(*xpad), 5)?;
            }
            if writer.bit_len() == 24 {
                tracing::warn!(
                    "service content id {} encodes to exactly 3 bytes and will \
                     decode as the ensemble-only shape",
                    id
                );
            }
        }
    }
    Ok(writer.into_bytes())
}

pub fn decode_contentid(payload: &[u8]) -> Result<ContentId> {
    if payload.len() == 3 {
        let mut reader = BitReader::new(payload);
        let ecc = reader.read(8)? as u8;
        let eid = reader.read(16)? as u16;
        return Ok(ContentId::Ensemble(EnsembleId { ecc, eid }));
    }
    let mut reader = BitReader::new(payload);
    reader.read(1)?;
    let ensemble_flag = reader.read_bool()?;
    let xpad_flag = reader.read_bool()?;
    let sid_size = reader.read_bool()?;
    let scids = reader.read(4)? as u8;
    let ensemble = if ensemble_flag {
        let ecc = reader.read(8)? as u8;
        let eid = reader.read(16)? as u16;
        Some(EnsembleId { ecc, eid })
    } else {
        None
    };
    let sid = if sid_size {
        ServiceId::Data(reader.read(32)? as u32)
    } else {
        ServiceId::Audio(reader.read(16)? as u16)
    };
    let xpad = if xpad_flag {
        reader.read(3)?;
        Some(reader.read(5)? as u8)
    } else {
        None
    };
    Ok(ContentId::Service {
        ensemble,
        sid,
        scids,
        xpad,
    })
}

/// Genre wire layout: `rfu(4) cs(4)` then one byte per dotted segment
/// of the term. The leading segment repeats the scheme code, so it is
/// emitted only when sub-levels follow it.
pub fn encode_genre(genre: &Genre) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    writer.write(0, 4)?;
    writer.write(u64::from(genre.scheme.code()), 4)?;
    if !genre.sublevels.is_empty() {
        writer.write(u64::from(genre.scheme.code()), 8)?;
        for sublevel in &genre.sublevels {
            writer.write(u64::from(*sublevel), 8)?;
        }
    }
    Ok(writer.into_bytes())
}

pub fn decode_genre(payload: &[u8]) -> Result<Genre> {
    let mut reader = BitReader::new(payload);
    reader.read(4)?;
    let code = reader.read(4)? as u8;
    let scheme = GenreScheme::from_code(code).ok_or(BinaryError::UnknownScheme { code })?;
    let mut levels = Vec::new();
    while !reader.is_empty() {
        levels.push(reader.read(8)? as u8);
    }
    let sublevels = match levels.split_first() {
        Some((first, rest)) if *first == code => rest.to_vec(),
        _ => levels,
    };
    Ok(Genre { scheme, sublevels })
}

/// DAB bearer wire layout: `rfa(1) ensemble_flag(1) xpad_flag(1)
/// sid_size(1) scids(4) [ecc(8) eid(16)] sid(16) [xpad(8)]`. IP bearers
/// are their raw URI bytes; FM bearers have no binary form.
pub fn encode_bearer(bearer: &Bearer) -> Result<Vec<u8>> {
    match bearer {
        Bearer::Dab {
            ensemble,
            sid,
            scids,
            xpad,
        } => {
            let mut writer = BitWriter::new();
            writer.write_bool(false);
            writer.write_bool(ensemble.is_some());
            writer.write_bool(xpad.is_some());
            // SId size flag: only 16-bit audio service ids are carried
            writer.write_bool(false);
            writer.write(u64::from(*scids), 4)?;
            if let Some(EnsembleId { ecc, eid }) = ensemble {
                writer.write(u64::from(*ecc), 8)?;
                writer.write(u64::from(*eid), 16)?;
            }
            writer.write(u64::from(*sid), 16)?;
            if let Some(xpad) = xpad {
                writer.write(u64::from(*xpad), 8)?;
            }
            Ok(writer.into_bytes())
        }
        Bearer::Ip { uri } => {
            tracing::warn!(
                "ip bearer {} carries no discriminator on the wire and will \
                 decode as a dab bearer",
                uri
            );
            Ok(uri.as_bytes().to_vec())
        }
        Bearer::Fm { .. } => Err(BinaryError::NotImplemented("FM bearer binary encoding")),
    }
}

/// Decode a bearer payload. The wire carries no discriminator between
/// the DAB bit layout and raw URI bytes, so every payload is read as
/// DAB; an attribute that was encoded from [`Bearer::Ip`] comes back as
/// a `Bearer::Dab` built from the URI bytes.
pub fn decode_bearer(payload: &[u8]) -> Result<Bearer> {
    let mut reader = BitReader::new(payload);
    reader.read(1)?;
    let ensemble_flag = reader.read_bool()?;
    let xpad_flag = reader.read_bool()?;
    let sid_size = reader.read_bool()?;
    let scids = reader.read(4)? as u8;
    if sid_size {
        return Err(BinaryError::NotImplemented(
            "32-bit data service ids in bearers",
        ));
    }
    let ensemble = if ensemble_flag {
        let ecc = reader.read(8)? as u8;
        let eid = reader.read(16)? as u16;
        Some(EnsembleId { ecc, eid })
    } else {
        None
    };
    let sid = reader.read(16)? as u16;
    let xpad = if xpad_flag {
        Some(reader.read(8)? as u8)
    } else {
        None
    };
    Ok(Bearer::Dab {
        ensemble,
        sid,
        scids,
        xpad,
    })
}
