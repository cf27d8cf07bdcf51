//! # Fund Escrow Contract
//!
//! A time-boxed, goal-based contribution pool. One contract instance is one
//! campaign: contributors deposit while the window is open; once it closes
//! the pool is either paid in full to the beneficiary (target reached) or
//! becomes refundable contributor by contributor (target missed).
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Creation     | constructor (`__constructor`)                    |
//! | Funding      | [`FundEscrow::contribute`]                       |
//! | Settlement   | [`FundEscrow::settle`]                           |
//! | Refund       | [`FundEscrow::claim_refund`]                     |
//! | Queries      | `get_campaign`, `contribution_of`, `phase`, ...  |
//!
//! ## Architecture
//!
//! Storage access is delegated to [`storage`] and [`ledger`]; price lookups
//! to [`oracle`]; event payloads to [`events`]. Every precondition is
//! checked before any state is written, so a returned error leaves the
//! campaign untouched.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, panic_with_error, token, Address, Env};

pub mod events;
mod ledger;
pub mod oracle;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod testutils;

use storage::{init_campaign, load_config, load_state, save_state};
pub use types::{Campaign, CampaignConfig, CampaignPhase, CampaignState, CampaignStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    WindowClosed = 1,
    InsufficientAmount = 2,
    NotBeneficiary = 3,
    WindowNotClosed = 4,
    TargetNotReached = 5,
    TargetReached = 6,
    NoFundsForCaller = 7,
    AlreadySettled = 8,
    OracleUnavailable = 9,
    InvalidParameters = 10,
    ArithmeticOverflow = 11,
}

#[contract]
pub struct FundEscrow;

#[contractimpl]
impl FundEscrow {
    // ─────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────

    /// Create the campaign. Parameters are immutable afterwards.
    ///
    /// - `lock_time` is the window length in seconds, counted from the
    ///   ledger timestamp at deployment.
    /// - `target` is in asset base units.
    /// - `min_value` is the per-contribution floor in the unit of account,
    ///   using the same decimal scale as the asset.
    pub fn __constructor(
        env: Env,
        beneficiary: Address,
        token: Address,
        oracle: Address,
        lock_time: u64,
        target: i128,
        min_value: i128,
    ) {
        if lock_time == 0 || target <= 0 || min_value < 0 {
            panic_with_error!(&env, Error::InvalidParameters);
        }
        let window_end = env
            .ledger()
            .timestamp()
            .checked_add(lock_time)
            .unwrap_or_else(|| panic_with_error!(&env, Error::InvalidParameters));

        let config = CampaignConfig {
            beneficiary,
            token,
            oracle,
            window_end,
            target,
            min_value,
        };
        init_campaign(&env, &config);

        events::emit_campaign_created(
            &env,
            events::CampaignCreated {
                beneficiary: config.beneficiary,
                token: config.token,
                oracle: config.oracle,
                window_end,
                target,
                min_value,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // State-changing entry points
    // ─────────────────────────────────────────────────────────

    /// Deposit `amount` of the funding asset from `contributor`.
    ///
    /// The floor is re-derived from the live oracle price on every call, so
    /// the same amount may be accepted at one price and rejected at another.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), Error> {
        contributor.require_auth();

        let config = load_config(&env);
        let mut state = load_state(&env);

        if env.ledger().timestamp() >= config.window_end {
            return Err(Error::WindowClosed);
        }
        if amount <= 0 {
            return Err(Error::InsufficientAmount);
        }

        let price = oracle::current_price(&env, &config.oracle)?;
        if amount < price.min_asset_amount(config.min_value)? {
            return Err(Error::InsufficientAmount);
        }

        state.total_received = state
            .total_received
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&contributor, &env.current_contract_address(), &amount);

        let total = ledger::record_contribution(&env, &contributor, amount)?;
        save_state(&env, &state);

        events::emit_contribution_received(&env, contributor, amount, total);
        Ok(())
    }

    /// Pay the entire pool to the beneficiary. Succeeds at most once.
    ///
    /// The caller is authorized before any campaign state is inspected.
    pub fn settle(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();

        let config = load_config(&env);
        if caller != config.beneficiary {
            return Err(Error::NotBeneficiary);
        }

        let mut state = load_state(&env);
        if state.status == CampaignStatus::SettledPaid {
            return Err(Error::AlreadySettled);
        }
        if env.ledger().timestamp() < config.window_end {
            return Err(Error::WindowNotClosed);
        }
        if state.total_received < config.target {
            return Err(Error::TargetNotReached);
        }

        // Flag flips together with the accounting, before the transfer.
        let amount = state.pool_balance();
        state.status = CampaignStatus::SettledPaid;
        state.total_disbursed += amount;
        save_state(&env, &state);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &config.beneficiary, &amount);

        log!(&env, "campaign settled", amount);
        events::emit_funds_disbursed(&env, config.beneficiary, amount);
        Ok(amount)
    }

    /// Return the caller's recorded contribution after a missed target.
    pub fn claim_refund(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();

        let config = load_config(&env);
        let mut state = load_state(&env);

        if env.ledger().timestamp() < config.window_end {
            return Err(Error::WindowNotClosed);
        }
        if state.total_received >= config.target {
            return Err(Error::TargetReached);
        }

        let amount = ledger::take_contribution(&env, &contributor);
        if amount == 0 {
            return Err(Error::NoFundsForCaller);
        }

        state.total_refunded += amount;
        save_state(&env, &state);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &contributor, &amount);

        log!(&env, "refund issued", contributor, amount);
        events::emit_refund_issued(&env, contributor, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn beneficiary(env: Env) -> Address {
        load_config(&env).beneficiary
    }

    pub fn oracle(env: Env) -> Address {
        load_config(&env).oracle
    }

    pub fn token(env: Env) -> Address {
        load_config(&env).token
    }

    pub fn window_end(env: Env) -> u64 {
        load_config(&env).window_end
    }

    pub fn target(env: Env) -> i128 {
        load_config(&env).target
    }

    pub fn min_value(env: Env) -> i128 {
        load_config(&env).min_value
    }

    /// Amount currently recorded for `contributor` (0 if none or refunded).
    pub fn contribution_of(env: Env, contributor: Address) -> i128 {
        ledger::contribution_of(&env, &contributor)
    }

    /// Stored settlement flag.
    pub fn status(env: Env) -> CampaignStatus {
        load_state(&env).status
    }

    /// Lifecycle phase derived from the clock and the totals.
    pub fn phase(env: Env) -> CampaignPhase {
        let config = load_config(&env);
        let state = load_state(&env);
        derive_phase(&env, &config, &state)
    }

    pub fn total_received(env: Env) -> i128 {
        load_state(&env).total_received
    }

    pub fn pool_balance(env: Env) -> i128 {
        load_state(&env).pool_balance()
    }

    pub fn get_campaign(env: Env) -> Campaign {
        let config = load_config(&env);
        let state = load_state(&env);
        let phase = derive_phase(&env, &config, &state);
        Campaign {
            beneficiary: config.beneficiary,
            token: config.token,
            oracle: config.oracle,
            window_end: config.window_end,
            target: config.target,
            min_value: config.min_value,
            total_received: state.total_received,
            pool_balance: state.pool_balance(),
            status: state.status,
            phase,
        }
    }

    /// Smallest contribution, in asset base units, accepted at the current price.
    pub fn min_contribution(env: Env) -> Result<i128, Error> {
        let config = load_config(&env);
        let price = oracle::current_price(&env, &config.oracle)?;
        // Non-positive amounts are rejected regardless of the floor.
        Ok(price.min_asset_amount(config.min_value)?.max(1))
    }
}

fn derive_phase(env: &Env, config: &CampaignConfig, state: &CampaignState) -> CampaignPhase {
    if state.status == CampaignStatus::SettledPaid {
        CampaignPhase::SettledPaid
    } else if env.ledger().timestamp() < config.window_end {
        CampaignPhase::Open
    } else if state.total_received >= config.target {
        CampaignPhase::ReachedAwaitingSettle
    } else {
        CampaignPhase::MissedRefundable
    }
}
