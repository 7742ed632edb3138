//! Unicode collation descriptors.
//!
//! An index over text columns can name its collation two ways: a legacy
//! numeric locale identifier, or a locale name. The two are mutually
//! exclusive, and each raw form carries exactly one of them — encoding a
//! descriptor into the form that cannot carry the supplied option is the
//! same error as supplying both.

use serde::{Deserialize, Serialize};

use silt_abi::{RawCollation, RawCollationNamed, TextVariant};

use crate::arena::PinningArena;
use crate::error::{InteropError, InteropResult};

/// How text is normalized when an index is built over it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Collation {
    /// Legacy numeric locale identifier; zero when unused.
    pub locale_id: u32,
    /// Locale name; `None` when unused.
    pub locale_name: Option<String>,
    /// Normalization flag bits, passed through to the engine.
    pub map_flags: u32,
}

impl Collation {
    /// Builds a descriptor from a legacy locale identifier.
    #[must_use]
    pub fn from_locale_id(locale_id: u32, map_flags: u32) -> Self {
        Collation {
            locale_id,
            locale_name: None,
            map_flags,
        }
    }

    /// Builds a descriptor from a locale name.
    #[must_use]
    pub fn from_locale_name(name: impl Into<String>, map_flags: u32) -> Self {
        Collation {
            locale_id: 0,
            locale_name: Some(name.into()),
            map_flags,
        }
    }

    /// Checks that at most one locale option is supplied.
    pub fn validate(&self) -> InteropResult<()> {
        if self.locale_id != 0 && self.locale_name.is_some() {
            return Err(InteropError::incompatible(
                "both a locale identifier and a locale name were supplied",
            ));
        }
        Ok(())
    }

    /// Encodes to the legacy locale-identifier form.
    ///
    /// Fails when a locale name is supplied; that form cannot carry one.
    pub fn to_raw_legacy(&self) -> InteropResult<RawCollation> {
        self.validate()?;
        if self.locale_name.is_some() {
            return Err(InteropError::incompatible(
                "the legacy collation form cannot carry a locale name",
            ));
        }
        Ok(RawCollation {
            locale_id: self.locale_id,
            map_flags: self.map_flags,
        })
    }

    /// Encodes to the named-locale form, pinning the name.
    ///
    /// Fails when a locale identifier is supplied; that form cannot
    /// carry one.
    pub fn to_raw_named(&self, arena: &mut PinningArena) -> InteropResult<RawCollationNamed> {
        self.validate()?;
        if self.locale_id != 0 {
            return Err(InteropError::incompatible(
                "the named collation form cannot carry a locale identifier",
            ));
        }
        Ok(RawCollationNamed {
            locale_name: arena.add_text(self.locale_name.as_deref(), TextVariant::Wide),
            map_flags: self.map_flags,
        })
    }

    /// Decodes the legacy form.
    #[must_use]
    pub fn from_raw_legacy(raw: &RawCollation) -> Self {
        Collation {
            locale_id: raw.locale_id,
            locale_name: None,
            map_flags: raw.map_flags,
        }
    }

    /// Best-effort locale name for this descriptor.
    ///
    /// Returns the supplied name when there is one, the known name of a
    /// legacy identifier otherwise, and `None` when neither is known. The
    /// invariant locale (127) maps to the empty name.
    #[must_use]
    pub fn effective_locale_name(&self) -> Option<&str> {
        if let Some(name) = self.locale_name.as_deref() {
            return Some(name);
        }
        match self.locale_id {
            127 => Some(""),
            1031 => Some("de-de"),
            1033 => Some("en-us"),
            1036 => Some("fr-fr"),
            1046 => Some("pt-br"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_options_are_incompatible() {
        let both = Collation {
            locale_id: 1033,
            locale_name: Some("en-us".to_string()),
            map_flags: 0,
        };
        assert!(matches!(
            both.validate(),
            Err(InteropError::IncompatibleOptions { .. })
        ));
    }

    #[test]
    fn legacy_form_roundtrip() {
        let collation = Collation::from_locale_id(1033, 0x400);
        let raw = collation.to_raw_legacy().unwrap();
        assert_eq!(raw.locale_id, 1033);
        assert_eq!(raw.map_flags, 0x400);
        assert_eq!(Collation::from_raw_legacy(&raw), collation);
    }

    #[test]
    fn legacy_form_rejects_a_name() {
        let named = Collation::from_locale_name("de-de", 0x30403);
        assert!(matches!(
            named.to_raw_legacy(),
            Err(InteropError::IncompatibleOptions { .. })
        ));
    }

    #[test]
    fn named_form_rejects_an_identifier() {
        let mut arena = PinningArena::new();
        let legacy = Collation::from_locale_id(1001, 0x30403);
        assert!(matches!(
            legacy.to_raw_named(&mut arena),
            Err(InteropError::IncompatibleOptions { .. })
        ));
    }

    #[test]
    fn named_form_pins_the_wide_name() {
        let mut arena = PinningArena::new();
        let collation = Collation::from_locale_name("pt-br", 0x400);
        let raw = collation.to_raw_named(&mut arena).unwrap();
        assert_eq!(raw.map_flags, 0x400);
        assert!(!raw.locale_name.is_null());
        // Safety: "pt-br" plus terminator was pinned as six wide units.
        let units = unsafe { std::slice::from_raw_parts(raw.locale_name.cast::<u16>(), 6) };
        assert_eq!(silt_abi::decode_wide_terminated(units), "pt-br");
    }

    #[test]
    fn absent_name_encodes_as_null() {
        let mut arena = PinningArena::new();
        let raw = Collation::default().to_raw_named(&mut arena).unwrap();
        assert!(raw.locale_name.is_null());
    }

    #[test]
    fn effective_name_prefers_the_supplied_name() {
        assert_eq!(
            Collation::from_locale_name("sr-latn", 0).effective_locale_name(),
            Some("sr-latn")
        );
        assert_eq!(
            Collation::from_locale_name("", 0).effective_locale_name(),
            Some("")
        );
    }

    #[test]
    fn effective_name_maps_known_identifiers() {
        assert_eq!(
            Collation::from_locale_id(1033, 0).effective_locale_name(),
            Some("en-us")
        );
        assert_eq!(
            Collation::from_locale_id(127, 0).effective_locale_name(),
            Some("")
        );
        assert_eq!(
            Collation::from_locale_id(0x0477, 0).effective_locale_name(),
            None
        );
        assert_eq!(Collation::default().effective_locale_name(), None);
    }
}
