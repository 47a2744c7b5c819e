// Content identifiers for transmitted services and components

use serde::{Deserialize, Serialize};
use std::fmt;

/// ECC and ensemble id pair identifying a DAB multiplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleId {
    pub ecc: u8,
    pub eid: u16,
}

impl fmt::Display for EnsembleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}.{:04x}", self.ecc, self.eid)
    }
}

/// Service id, 16-bit for audio services and 32-bit for data services.
/// The width is carried on the wire by the SId-size flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceId {
    Audio(u16),
    Data(u32),
}

/// Identifies the subject of a document: either a whole ensemble (the
/// exact three-byte wire shape) or a service component within one.
///
/// The two shapes are distinguished on the wire purely by total payload
/// length; a service shape that happens to total three bytes is
/// indistinguishable from the ensemble shape. That ambiguity is
/// inherited from the standard and flagged at encode time rather than
/// silently resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentId {
    Ensemble(EnsembleId),
    Service {
        /// Present when the service is carried on a different ensemble
        /// than the document itself.
        ensemble: Option<EnsembleId>,
        sid: ServiceId,
        /// Service component id within the service, 4 bits.
        scids: u8,
        /// X-PAD application type, when the component rides in X-PAD.
        xpad: Option<u8>,
    },
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Ensemble(ensemble) => write!(f, "{ensemble}"),
            ContentId::Service {
                ensemble,
                sid,
                scids,
                ..
            } => {
                if let Some(ensemble) = ensemble {
                    write!(f, "{ensemble}.")?;
                }
                match sid {
                    ServiceId::Audio(sid) => write!(f, "{sid:04x}.{scids:x}"),
                    ServiceId::Data(sid) => write!(f, "{sid:08x}.{scids:x}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let id = ContentId::Ensemble(EnsembleId {
            ecc: 0xE1,
            eid: 0xC479,
        });
        assert_eq!(id.to_string(), "e1.c479");

        let id = ContentId::Service {
            ensemble: Some(EnsembleId {
                ecc: 0xE1,
                eid: 0xC479,
            }),
            sid: ServiceId::Audio(0xC7D8),
            scids: 0,
            xpad: None,
        };
        assert_eq!(id.to_string(), "e1.c479.c7d8.0");
    }
}
