use std::time::Duration;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonmint_core::collection::BatchMintValue;
use tonmint_core::TonAddress;

/// Most messages a standard wallet accepts in one transaction.
pub const MAX_MESSAGES_PER_TX: usize = 4;

#[derive(Error, Debug)]
pub enum MinterConfigError {
    #[error("Config JSON error ({0})")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value ({0})")]
    InvalidValue(String),
}

/// Settings of deployment and minting runs.
///
/// TON amounts are decimal strings (`"0.02"`) and are converted to nanotons exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinterConfig {
    /// Address of an already deployed collection.
    pub collection_address: Option<TonAddress>,
    pub workchain: i32,
    #[serde(with = "ton_amount")]
    pub deploy_value: BigUint,
    /// Attached to change owner and change content messages.
    #[serde(with = "ton_amount")]
    pub admin_value: BigUint,
    #[serde(with = "ton_amount")]
    pub mint_value_per_item: BigUint,
    #[serde(with = "ton_amount")]
    pub mint_value_margin: BigUint,
    pub messages_per_tx: usize,
    pub pause_between_txs_secs: u64,
    /// Transactions of a mint plan already sent by a previous run.
    pub start_tx: usize,
}

impl MinterConfig {
    pub fn from_json(config: &str) -> Result<Self, MinterConfigError> {
        let config: MinterConfig = serde_json::from_str(config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, MinterConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), MinterConfigError> {
        if !(1..=MAX_MESSAGES_PER_TX).contains(&self.messages_per_tx) {
            return Err(MinterConfigError::InvalidValue(format!(
                "messages_per_tx must be within 1..={}, got {}",
                MAX_MESSAGES_PER_TX, self.messages_per_tx
            )));
        }
        if !(-128..=127).contains(&self.workchain) {
            return Err(MinterConfigError::InvalidValue(format!(
                "workchain must fit into int8, got {}",
                self.workchain
            )));
        }
        Ok(())
    }

    pub fn batch_mint_value(&self) -> BatchMintValue {
        BatchMintValue::new(
            self.mint_value_per_item.clone(),
            self.mint_value_margin.clone(),
        )
    }

    pub fn pause_between_txs(&self) -> Duration {
        Duration::from_secs(self.pause_between_txs_secs)
    }
}

impl Default for MinterConfig {
    fn default() -> Self {
        let mint_value = BatchMintValue::default();
        MinterConfig {
            collection_address: None,
            workchain: 0,
            deploy_value: BigUint::from(100_000_000u64),
            admin_value: BigUint::from(50_000_000u64),
            mint_value_per_item: mint_value.per_item,
            mint_value_margin: mint_value.margin,
            messages_per_tx: MAX_MESSAGES_PER_TX,
            pause_between_txs_secs: 30,
            start_tx: 0,
        }
    }
}

mod ton_amount {
    use num_bigint::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use tonmint_core::{from_nano, to_nano};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&from_nano(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let amount = String::deserialize(deserializer)?;
        to_nano(&amount).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use tonmint_core::to_nano;

    use super::{MinterConfig, MinterConfigError};

    #[test]
    fn defaults_match_mint_scripts() {
        let config = MinterConfig::from_json("{}").unwrap();
        assert_eq!(config, MinterConfig::default());
        assert_eq!(config.messages_per_tx, 4);
        assert_eq!(config.pause_between_txs().as_secs(), 30);
        assert_eq!(
            config.batch_mint_value().value(210),
            BigUint::from(5_200_000_000u64)
        );
    }

    #[test]
    fn amounts_are_decimal_strings() {
        let config = MinterConfig::from_json(
            r#"{
                "collection_address": "EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR",
                "deploy_value": "0.25",
                "mint_value_per_item": "0.035",
                "start_tx": 5
            }"#,
        )
        .unwrap();
        assert_eq!(config.deploy_value, to_nano("0.25").unwrap());
        assert_eq!(config.mint_value_per_item, BigUint::from(35_000_000u64));
        assert_eq!(config.start_tx, 5);
        assert!(config.collection_address.is_some());

        let json = config.to_json().unwrap();
        assert!(json.contains("\"0.035\""));
        assert_eq!(MinterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            MinterConfig::from_json(r#"{"deploy_value": "0.1234567891"}"#),
            Err(MinterConfigError::Json(_))
        ));
        assert!(matches!(
            MinterConfig::from_json(r#"{"messages_per_tx": 5}"#),
            Err(MinterConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            MinterConfig::from_json(r#"{"messages_per_tx": 0}"#),
            Err(MinterConfigError::InvalidValue(_))
        ));
    }
}
