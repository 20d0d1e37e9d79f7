//! Crew payout split.
//!
//! In contract mode the pot is the sum of contract payouts; in commodity
//! mode it is whatever figure the crew enters by hand. Each member receives
//! `share / total_shares` of the pot. Shares are relative weights and need
//! not add up to 100.

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::sizing::HaulingMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub share: u32,
}

impl CrewMember {
    pub fn new(name: impl Into<String>, share: u32) -> Self {
        Self {
            name: name.into(),
            share,
        }
    }
}

/// One member's cut, in aUEC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewPayment {
    pub name: String,
    pub share: u32,
    pub amount: f64,
}

pub fn default_crew() -> Vec<CrewMember> {
    vec![
        CrewMember::new("Captain", 40),
        CrewMember::new("Co-Pilot", 30),
        CrewMember::new("Engineer", 30),
    ]
}

/// Sum of contract payouts; contracts without one count as zero.
pub fn total_payout(contracts: &[Contract]) -> u64 {
    contracts.iter().filter_map(|c| c.payout).sum()
}

pub fn effective_payout(mode: HaulingMode, contracts: &[Contract], manual: u64) -> u64 {
    match mode {
        HaulingMode::Contract => total_payout(contracts),
        HaulingMode::Commodity => manual,
    }
}

pub fn total_shares(crew: &[CrewMember]) -> u32 {
    crew.iter().map(|m| m.share).sum()
}

pub fn shares_balanced(crew: &[CrewMember]) -> bool {
    total_shares(crew) == 100
}

/// Split `payout` across `crew` by share. Everyone gets 0 when no shares are set.
pub fn distribute_payout(payout: u64, crew: &[CrewMember]) -> Vec<CrewPayment> {
    let total = total_shares(crew);
    crew.iter()
        .map(|m| CrewPayment {
            name: m.name.clone(),
            share: m.share,
            amount: if total == 0 {
                0.0
            } else {
                m.share as f64 / total as f64 * payout as f64
            },
        })
        .collect()
}
