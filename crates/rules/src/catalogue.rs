//! Built-in rule table for the legacy crypto configuration.
//!
//! Most configuration options have to be enabled explicitly: turning on an
//! option without one of its public dependencies is a configuration error that
//! this crate does not try to repair. A handful of options are enabled
//! automatically instead, either because they are internal helpers that should
//! not become part of the public configuration surface, or because a module
//! gained a dependency after release and configurations written against the
//! older release must keep working. This module lists those automatic
//! adjustments.
//!
//! The table is built once per process by [`legacy_crypto`]. Callers that need
//! a private copy (for example to reorder rules) can start from
//! [`legacy_crypto_vocabulary`] and [`legacy_crypto_rules`].

use std::sync::OnceLock;

use crate::{Predicate, Rule, RuleReason, RuleTable, TableError, Vocabulary};

/// Configuration symbol names known to the legacy crypto table.
pub mod symbols {
    /// Full message-digest module.
    pub const MD_C: &str = "MBEDTLS_MD_C";
    /// Subset of the message-digest module shared with other modules.
    pub const MD_LIGHT: &str = "MBEDTLS_MD_LIGHT";
    /// EC J-PAKE key exchange.
    pub const ECJPAKE_C: &str = "MBEDTLS_ECJPAKE_C";
    /// PEM parsing.
    pub const PEM_PARSE_C: &str = "MBEDTLS_PEM_PARSE_C";
    /// Entropy accumulator.
    pub const ENTROPY_C: &str = "MBEDTLS_ENTROPY_C";
    /// Public-key abstraction layer.
    pub const PK_C: &str = "MBEDTLS_PK_C";
    /// PKCS#12 support.
    pub const PKCS12_C: &str = "MBEDTLS_PKCS12_C";
    /// RSA public-key cryptosystem.
    pub const RSA_C: &str = "MBEDTLS_RSA_C";
    /// TLS protocol layer.
    pub const SSL_TLS_C: &str = "MBEDTLS_SSL_TLS_C";
    /// Common X.509 usage support.
    pub const X509_USE_C: &str = "MBEDTLS_X509_USE_C";
    /// Common X.509 writing support.
    pub const X509_CREATE_C: &str = "MBEDTLS_X509_CREATE_C";
    /// Full elliptic-curve arithmetic.
    pub const ECP_C: &str = "MBEDTLS_ECP_C";
    /// Elliptic-curve core without curve arithmetic.
    pub const ECP_LIGHT: &str = "MBEDTLS_ECP_LIGHT";
    /// Parsing of EC keys with explicit (extended) curve parameters.
    pub const PK_PARSE_EC_EXTENDED: &str = "MBEDTLS_PK_PARSE_EC_EXTENDED";
    /// Parsing of EC keys with compressed points.
    pub const PK_PARSE_EC_COMPRESSED: &str = "MBEDTLS_PK_PARSE_EC_COMPRESSED";
    /// Built-in Weierstrass key-pair derivation.
    pub const PSA_BUILTIN_KEY_TYPE_ECC_KEY_PAIR_DERIVE: &str =
        "MBEDTLS_PSA_BUILTIN_KEY_TYPE_ECC_KEY_PAIR_DERIVE";
    /// Public-key parsing.
    pub const PK_PARSE_C: &str = "MBEDTLS_PK_PARSE_C";
    /// Public-key writing.
    pub const PK_WRITE_C: &str = "MBEDTLS_PK_WRITE_C";
    /// Mode switch: route legacy APIs through the PSA crypto API.
    pub const USE_PSA_CRYPTO: &str = "MBEDTLS_USE_PSA_CRYPTO";
    /// PSA ECDH algorithm requested.
    pub const PSA_WANT_ALG_ECDH: &str = "PSA_WANT_ALG_ECDH";
    /// Built-in ECDH module.
    pub const ECDH_C: &str = "MBEDTLS_ECDH_C";
    /// ECDH is available through either implementation.
    pub const CAN_ECDH: &str = "MBEDTLS_CAN_ECDH";
    /// Built-in ECDSA module.
    pub const ECDSA_C: &str = "MBEDTLS_ECDSA_C";
    /// PSA ECDSA algorithm requested.
    pub const PSA_WANT_ALG_ECDSA: &str = "PSA_WANT_ALG_ECDSA";
    /// PSA basic EC key-pair support requested.
    pub const PSA_WANT_KEY_TYPE_ECC_KEY_PAIR_BASIC: &str = "PSA_WANT_KEY_TYPE_ECC_KEY_PAIR_BASIC";
    /// PSA EC public-key support requested.
    pub const PSA_WANT_KEY_TYPE_ECC_PUBLIC_KEY: &str = "PSA_WANT_KEY_TYPE_ECC_PUBLIC_KEY";
    /// The PK layer can produce ECDSA signatures.
    pub const PK_CAN_ECDSA_SIGN: &str = "MBEDTLS_PK_CAN_ECDSA_SIGN";
    /// The PK layer can verify ECDSA signatures.
    pub const PK_CAN_ECDSA_VERIFY: &str = "MBEDTLS_PK_CAN_ECDSA_VERIFY";
    /// The PK layer can do at least one ECDSA operation.
    pub const PK_CAN_ECDSA_SOME: &str = "MBEDTLS_PK_CAN_ECDSA_SOME";
    /// PSA crypto core.
    pub const PSA_CRYPTO_C: &str = "MBEDTLS_PSA_CRYPTO_C";
    /// PSA crypto client side.
    pub const PSA_CRYPTO_CLIENT: &str = "MBEDTLS_PSA_CRYPTO_CLIENT";
    /// The PK layer supports EC keys.
    pub const PK_HAVE_ECC_KEYS: &str = "MBEDTLS_PK_HAVE_ECC_KEYS";
}

#[allow(clippy::wildcard_imports)]
use symbols::*;

/// Every symbol of the legacy crypto table, in declaration order.
pub const LEGACY_CRYPTO_FLAGS: &[&str] = &[
    MD_C,
    MD_LIGHT,
    ECJPAKE_C,
    PEM_PARSE_C,
    ENTROPY_C,
    PK_C,
    PKCS12_C,
    RSA_C,
    SSL_TLS_C,
    X509_USE_C,
    X509_CREATE_C,
    ECP_C,
    ECP_LIGHT,
    PK_PARSE_EC_EXTENDED,
    PK_PARSE_EC_COMPRESSED,
    PSA_BUILTIN_KEY_TYPE_ECC_KEY_PAIR_DERIVE,
    PK_PARSE_C,
    PK_WRITE_C,
    USE_PSA_CRYPTO,
    PSA_WANT_ALG_ECDH,
    ECDH_C,
    CAN_ECDH,
    ECDSA_C,
    PSA_WANT_ALG_ECDSA,
    PSA_WANT_KEY_TYPE_ECC_KEY_PAIR_BASIC,
    PSA_WANT_KEY_TYPE_ECC_PUBLIC_KEY,
    PK_CAN_ECDSA_SIGN,
    PK_CAN_ECDSA_VERIFY,
    PK_CAN_ECDSA_SOME,
    PSA_CRYPTO_C,
    PSA_CRYPTO_CLIENT,
    PK_HAVE_ECC_KEYS,
];

/// Returns the shared legacy crypto table, building it on first use.
///
/// # Examples
///
/// ```
/// use rules::catalogue::{self, symbols};
///
/// let table = catalogue::legacy_crypto().unwrap();
/// assert!(table.is_derived(symbols::MD_LIGHT));
/// assert!(!table.is_derived(symbols::USE_PSA_CRYPTO));
/// ```
pub fn legacy_crypto() -> Result<&'static RuleTable, TableError> {
    static TABLE: OnceLock<Result<RuleTable, TableError>> = OnceLock::new();
    TABLE
        .get_or_init(|| RuleTable::new(legacy_crypto_vocabulary()?, legacy_crypto_rules()))
        .as_ref()
        .map_err(Clone::clone)
}

/// Builds the vocabulary of [`LEGACY_CRYPTO_FLAGS`].
pub fn legacy_crypto_vocabulary() -> Result<Vocabulary, TableError> {
    Vocabulary::new(LEGACY_CRYPTO_FLAGS.iter().copied())
}

/// Returns the legacy crypto rules in declaration order.
///
/// Several rules read flags derived by later rules (the PK module pulled in by
/// PSA plus RSA feeds the message-digest and compressed-point rules declared
/// above it). The resolver handles these forward references.
#[must_use]
pub fn legacy_crypto_rules() -> Vec<Rule> {
    let psa = || Predicate::flag(USE_PSA_CRYPTO);
    let legacy = || Predicate::negate(USE_PSA_CRYPTO);

    vec![
        Rule::new(MD_LIGHT, MD_C)
            .with_reason(RuleReason::Superset)
            .with_note("lets code test MD_LIGHT alone instead of MD_LIGHT or MD_C"),
        Rule::new(
            MD_LIGHT,
            Predicate::any([
                ECJPAKE_C,
                PEM_PARSE_C,
                ENTROPY_C,
                PK_C,
                PKCS12_C,
                RSA_C,
                SSL_TLS_C,
                X509_USE_C,
                X509_CREATE_C,
            ]),
        )
        .with_reason(RuleReason::BackwardCompat)
        .with_note("these modules did not require MD_LIGHT in earlier releases"),
        Rule::new(ECP_LIGHT, ECP_C)
            .with_reason(RuleReason::Superset)
            .with_note("ECP_C is ECP_LIGHT plus curve arithmetic"),
        Rule::new(
            ECP_LIGHT,
            Predicate::any([
                PK_PARSE_EC_EXTENDED,
                PK_PARSE_EC_COMPRESSED,
                PSA_BUILTIN_KEY_TYPE_ECC_KEY_PAIR_DERIVE,
            ]),
        )
        .with_reason(RuleReason::Temporary)
        .with_note("only the built-in EC core provides these features today"),
        Rule::new(PK_PARSE_EC_COMPRESSED, Predicate::all([PK_PARSE_C, ECP_C]))
            .with_reason(RuleReason::BackwardCompat)
            .with_note("compressed points used to come with PK_PARSE_C and ECP_C"),
        Rule::new(
            CAN_ECDH,
            Predicate::all([psa(), Predicate::flag(PSA_WANT_ALG_ECDH)]),
        )
        .with_reason(RuleReason::Capability)
        .with_note("ECDH through PSA"),
        Rule::new(CAN_ECDH, Predicate::all([legacy(), Predicate::flag(ECDH_C)]))
            .with_reason(RuleReason::Capability)
            .with_note("ECDH through the built-in module"),
        Rule::new(
            PK_CAN_ECDSA_SIGN,
            Predicate::all([legacy(), Predicate::flag(ECDSA_C)]),
        )
        .with_reason(RuleReason::Capability),
        Rule::new(
            PK_CAN_ECDSA_VERIFY,
            Predicate::all([legacy(), Predicate::flag(ECDSA_C)]),
        )
        .with_reason(RuleReason::Capability),
        Rule::new(
            PK_CAN_ECDSA_SIGN,
            Predicate::all([
                psa(),
                Predicate::flag(PSA_WANT_ALG_ECDSA),
                Predicate::flag(PSA_WANT_KEY_TYPE_ECC_KEY_PAIR_BASIC),
            ]),
        )
        .with_reason(RuleReason::Capability),
        Rule::new(
            PK_CAN_ECDSA_VERIFY,
            Predicate::all([
                psa(),
                Predicate::flag(PSA_WANT_ALG_ECDSA),
                Predicate::flag(PSA_WANT_KEY_TYPE_ECC_PUBLIC_KEY),
            ]),
        )
        .with_reason(RuleReason::Capability),
        Rule::new(
            PK_CAN_ECDSA_SOME,
            Predicate::any([PK_CAN_ECDSA_VERIFY, PK_CAN_ECDSA_SIGN]),
        )
        .with_reason(RuleReason::Capability),
        Rule::new(PSA_CRYPTO_CLIENT, PSA_CRYPTO_C)
            .with_reason(RuleReason::Superset)
            .with_note("the PSA core includes all client code"),
        Rule::new(PK_C, Predicate::all([PSA_CRYPTO_C, RSA_C]))
            .with_reason(RuleReason::Internal)
            .with_note("PK wrappers format RSA keys for the PSA API"),
        Rule::new(PK_WRITE_C, Predicate::all([PSA_CRYPTO_C, RSA_C]))
            .with_reason(RuleReason::Internal)
            .with_note("PK wrappers format RSA keys for the PSA API"),
        Rule::new(PK_PARSE_C, Predicate::all([PSA_CRYPTO_C, RSA_C]))
            .with_reason(RuleReason::Internal)
            .with_note("PK wrappers format RSA keys for the PSA API"),
        Rule::new(
            PK_HAVE_ECC_KEYS,
            Predicate::any([
                Predicate::flag(ECP_C),
                Predicate::all([psa(), Predicate::flag(PSA_WANT_KEY_TYPE_ECC_PUBLIC_KEY)]),
            ]),
        )
        .with_reason(RuleReason::Capability)
        .with_note("EC keys through the legacy module or PSA key storage"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_table_builds() {
        let table = legacy_crypto().expect("catalogue is valid");
        assert_eq!(table.vocabulary().len(), LEGACY_CRYPTO_FLAGS.len());
        assert_eq!(table.len(), legacy_crypto_rules().len());
    }

    #[test]
    fn shared_table_is_built_once() {
        let first = legacy_crypto().expect("catalogue is valid");
        let second = legacy_crypto().expect("catalogue is valid");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn mode_switch_is_never_derived() {
        let table = legacy_crypto().expect("catalogue is valid");
        assert!(!table.is_derived(USE_PSA_CRYPTO));
    }

    #[test]
    fn capability_branches_are_mutually_exclusive() {
        let table = legacy_crypto().expect("catalogue is valid");
        let branches: Vec<&Predicate> = table
            .rules_deriving(CAN_ECDH)
            .map(|(_, rule)| rule.predicate())
            .collect();
        assert_eq!(
            branches,
            [
                &Predicate::all([USE_PSA_CRYPTO, PSA_WANT_ALG_ECDH]),
                &Predicate::all([Predicate::negate(USE_PSA_CRYPTO), Predicate::flag(ECDH_C)]),
            ]
        );
    }

    #[test]
    fn every_rule_carries_a_reason() {
        for rule in legacy_crypto_rules() {
            assert_ne!(rule.reason(), RuleReason::Implied, "{rule}");
        }
    }
}
