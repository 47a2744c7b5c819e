// Transmission bearers

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EnsembleId;

/// A transmission path for a service.
///
/// Only the DAB and IP variants have a binary wire form. FM bearers
/// exist in the textual (XML) encoding of the same documents; the
/// binary standard defines no layout for them, so encoding or decoding
/// one fails with `NotImplemented` instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bearer {
    Dab {
        /// Present when the service lives on a different ensemble than
        /// the document carrying the reference.
        ensemble: Option<EnsembleId>,
        /// 16-bit audio service id.
        sid: u16,
        /// Service component id, 4 bits.
        scids: u8,
        /// X-PAD application type when carried in an X-PAD channel.
        xpad: Option<u8>,
    },
    Ip {
        uri: String,
    },
    Fm {
        ecc: u8,
        pi: u16,
        frequency_khz: Option<u32>,
    },
}

impl fmt::Display for Bearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bearer::Dab {
                ensemble,
                sid,
                scids,
                ..
            } => {
                write!(f, "dab:")?;
                if let Some(ensemble) = ensemble {
                    write!(f, "{ensemble}.")?;
                }
                write!(f, "{sid:04x}.{scids:x}")
            }
            Bearer::Ip { uri } => write!(f, "{uri}"),
            Bearer::Fm { ecc, pi, .. } => write!(f, "fm:{ecc:02x}.{pi:04x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let bearer = Bearer::Dab {
            ensemble: Some(EnsembleId {
                ecc: 0xE1,
                eid: 0xC181,
            }),
            sid: 0xC7D8,
            scids: 0,
            xpad: None,
        };
        assert_eq!(bearer.to_string(), "dab:e1.c181.c7d8.0");

        let bearer = Bearer::Ip {
            uri: "http://example.com/stream".to_string(),
        };
        assert_eq!(bearer.to_string(), "http://example.com/stream");
    }
}
