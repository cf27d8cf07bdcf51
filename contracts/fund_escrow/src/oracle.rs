//! # Price oracle adapter
//!
//! The escrow never computes or caches a price. Every admission check calls
//! the feed contract through [`PriceFeedClient`] and converts with the fresh
//! answer. Any failure of the feed (trap, missing contract, bad return type,
//! non-positive answer) surfaces as [`Error::OracleUnavailable`].

use soroban_sdk::{contractclient, Address, Env};

use crate::Error;

/// Interface the price feed contract must expose.
///
/// `latest_answer` is the price of one whole asset unit in the unit of
/// account, scaled by `10^decimals`.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn decimals(env: Env) -> u32;
    fn latest_answer(env: Env) -> i128;
}

/// A single price observation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Price {
    pub answer: i128,
    pub decimals: u32,
}

impl Price {
    fn scale(&self) -> Result<i128, Error> {
        10i128
            .checked_pow(self.decimals)
            .ok_or(Error::OracleUnavailable)
    }

    /// Smallest asset amount whose value is at least `min_value`.
    ///
    /// `amount * answer / 10^decimals >= min_value` holds exactly when
    /// `amount >= ceil(min_value * 10^decimals / answer)`.
    pub fn min_asset_amount(&self, min_value: i128) -> Result<i128, Error> {
        let scale = self.scale()?;
        let numerator = min_value
            .checked_mul(scale)
            .ok_or(Error::ArithmeticOverflow)?;
        if numerator <= 0 {
            return Ok(0);
        }
        Ok((numerator - 1) / self.answer + 1)
    }
}

/// Query the feed at `oracle` for the current price.
pub fn current_price(env: &Env, oracle: &Address) -> Result<Price, Error> {
    let feed = PriceFeedClient::new(env, oracle);

    let decimals = match feed.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(Error::OracleUnavailable),
    };
    let answer = match feed.try_latest_answer() {
        Ok(Ok(answer)) => answer,
        _ => return Err(Error::OracleUnavailable),
    };

    if answer <= 0 {
        return Err(Error::OracleUnavailable);
    }
    Ok(Price { answer, decimals })
}
