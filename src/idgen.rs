// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generation of checksum-valid financial identifiers: ABA routing numbers,
//! account numbers, SWIFT/BIC codes, IBANs, sort codes, PINs, card numbers,
//! and transaction references.
//!
//! Uniqueness is enforced against an in-process set per identifier kind with
//! a bounded retry budget. The set is not shared with the store; the minting
//! paths used at account-open and card-request time additionally probe the
//! persisted UNIQUE columns (`*_checked` variants), and the database
//! constraints remain the final word.

use chrono::Utc;
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};

const MAX_ATTEMPTS: usize = 1_000;
// 4-digit PIN space is tiny; give the retry loop more room.
const PIN_ATTEMPTS: usize = 10_000;
const DB_PROBE_ATTEMPTS: usize = 32;

const DISTRICT_CODES: &[&str] = &["01", "02", "03", "04", "11", "12", "21", "22", "31", "32"];
const BANK_CODES: &[&str] = &["BARC", "CHAS", "CITI", "DEUT", "HSBC", "BNPA", "INGB", "UBSW"];
const COUNTRY_CODES: &[&str] = &["GB", "US", "DE", "FR", "NL", "CH"];
const LOCATION_CODES: &[&str] = &["2L", "33", "22", "B7", "MM"];
const BRANCH_CODES: &[&str] = &["XXX", "001", "002"];
const SORT_PREFIXES: &[&str] = &["20", "23", "30", "40", "60", "77", "83"];

// (fixed leading digit, total length) bank-style account number patterns.
const ACCOUNT_PATTERNS: &[(Option<char>, usize)] = &[
    (None, 7),
    (None, 8),
    (Some('1'), 9),
    (Some('4'), 10),
    (None, 12),
    (None, 15),
];

const VISA_BINS: &[&str] = &["4"];
const MASTERCARD_BINS: &[&str] = &["51", "52", "53", "54", "55", "22"];
const AMEX_BINS: &[&str] = &["34", "37"];

/// Issues identifiers, remembering everything it has handed out so the same
/// value is never issued twice by this process.
#[derive(Default)]
pub struct IdGenerator {
    routing_numbers: HashSet<String>,
    account_numbers: HashSet<String>,
    sort_codes: HashSet<String>,
    card_numbers: HashSet<String>,
    pins: HashSet<String>,
    references: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 9-digit ABA routing number: 2-digit district code, 6 random digits,
    /// weighted check digit.
    pub fn routing_number(&mut self) -> EngineResult<String> {
        retry_unique(&mut self.routing_numbers, "routing number", MAX_ATTEMPTS, || {
            let mut rng = rand::thread_rng();
            let district = DISTRICT_CODES[rng.gen_range(0..DISTRICT_CODES.len())];
            let institution: u32 = rng.gen_range(0..1_000_000);
            let first8 = format!("{}{:06}", district, institution);
            format!("{}{}", first8, aba_check_digit(&first8))
        })
    }

    /// Bank-style account number. Without a prefix, picks one of the fixed
    /// realistic patterns. With a prefix, fills random digits up to `length`
    /// (default 12); rejects configurations where prefix and separator leave
    /// no room for random digits.
    pub fn account_number(
        &mut self,
        prefix: Option<&str>,
        length: Option<usize>,
        separator: Option<&str>,
    ) -> EngineResult<String> {
        if let Some(prefix) = prefix {
            let length = length.unwrap_or(12);
            let separator = separator.unwrap_or("");
            let fixed = prefix.len() + separator.len();
            if fixed >= length {
                return Err(EngineError::validation(format!(
                    "Prefix '{}' and separator leave no digits for a length-{} account number",
                    prefix, length
                )));
            }
            let fill = length - fixed;
            let prefix = prefix.to_string();
            let separator = separator.to_string();
            return retry_unique(
                &mut self.account_numbers,
                "account number",
                MAX_ATTEMPTS,
                || format!("{}{}{}", prefix, separator, random_digits(fill)),
            );
        }
        retry_unique(&mut self.account_numbers, "account number", MAX_ATTEMPTS, || {
            let mut rng = rand::thread_rng();
            let (lead, len) = ACCOUNT_PATTERNS[rng.gen_range(0..ACCOUNT_PATTERNS.len())];
            match lead {
                Some(c) => format!("{}{}", c, random_digits(len - 1)),
                None => {
                    // no leading zero on the unprefixed patterns
                    let first = rng.gen_range(1..10);
                    format!("{}{}", first, random_digits(len - 1))
                }
            }
        })
    }

    /// Account number probed against the persisted UNIQUE column as well.
    pub fn account_number_checked(&mut self, conn: &Connection) -> EngineResult<String> {
        for _ in 0..DB_PROBE_ATTEMPTS {
            let candidate = self.account_number(None, None, None)?;
            let taken: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM accounts WHERE account_number=?1",
                    params![&candidate],
                    |r| r.get(0),
                )
                .optional()?;
            if taken.is_none() {
                return Ok(candidate);
            }
        }
        Err(EngineError::Exhaustion("account number"))
    }

    /// SWIFT/BIC: bank code + country + location, with an optional branch
    /// code. No checksum exists for BICs.
    pub fn swift_bic(&mut self) -> String {
        let mut rng = rand::thread_rng();
        let bank = BANK_CODES[rng.gen_range(0..BANK_CODES.len())];
        let country = COUNTRY_CODES[rng.gen_range(0..COUNTRY_CODES.len())];
        let location = LOCATION_CODES[rng.gen_range(0..LOCATION_CODES.len())];
        if rng.gen_bool(0.5) {
            let branch = BRANCH_CODES[rng.gen_range(0..BRANCH_CODES.len())];
            format!("{}{}{}{}", bank, country, location, branch)
        } else {
            format!("{}{}{}", bank, country, location)
        }
    }

    /// UK-style sort code, "XX-XX-XX", first pair from a fixed bank pool.
    pub fn sort_code(&mut self) -> EngineResult<String> {
        retry_unique(&mut self.sort_codes, "sort code", MAX_ATTEMPTS, || {
            let mut rng = rand::thread_rng();
            let prefix = SORT_PREFIXES[rng.gen_range(0..SORT_PREFIXES.len())];
            let rest: u32 = rng.gen_range(0..10_000);
            let digits = format!("{}{:04}", prefix, rest);
            format!("{}-{}-{}", &digits[0..2], &digits[2..4], &digits[4..6])
        })
    }

    /// 4-digit PIN avoiding weak patterns (all-same digits, ascending or
    /// descending runs).
    pub fn pin(&mut self) -> EngineResult<String> {
        for _ in 0..PIN_ATTEMPTS {
            let candidate = random_digits(4);
            if is_weak_pin(&candidate) {
                continue;
            }
            if self.pins.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(EngineError::Exhaustion("PIN"))
    }

    /// Card number with a brand BIN prefix and a Luhn check digit.
    /// 15 digits for amex, 16 for everything else.
    pub fn card_number(&mut self, brand: &str) -> EngineResult<String> {
        let (bins, total_len): (&[&str], usize) = match brand {
            "amex" => (AMEX_BINS, 15),
            "mastercard" => (MASTERCARD_BINS, 16),
            _ => (VISA_BINS, 16),
        };
        retry_unique(&mut self.card_numbers, "card number", MAX_ATTEMPTS, || {
            let mut rng = rand::thread_rng();
            let bin = bins[rng.gen_range(0..bins.len())];
            let body = format!("{}{}", bin, random_digits(total_len - bin.len() - 1));
            format!("{}{}", body, luhn_check_digit(&body))
        })
    }

    /// Card number probed against the persisted UNIQUE column as well.
    pub fn card_number_checked(&mut self, conn: &Connection, brand: &str) -> EngineResult<String> {
        for _ in 0..DB_PROBE_ATTEMPTS {
            let candidate = self.card_number(brand)?;
            let taken: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM cards WHERE card_number=?1",
                    params![&candidate],
                    |r| r.get(0),
                )
                .optional()?;
            if taken.is_none() {
                return Ok(candidate);
            }
        }
        Err(EngineError::Exhaustion("card number"))
    }

    /// Card verification value; 4 digits for amex, 3 otherwise. Not tracked
    /// for uniqueness.
    pub fn cvv(&mut self, brand: &str) -> String {
        let len = if brand == "amex" { 4 } else { 3 };
        random_digits(len)
    }

    /// Transaction reference: YYMMDD date prefix + 10 zero-padded random
    /// digits.
    pub fn transaction_reference(&mut self) -> EngineResult<String> {
        retry_unique(&mut self.references, "transaction reference", MAX_ATTEMPTS, || {
            let mut rng = rand::thread_rng();
            let suffix: u64 = rng.gen_range(0..10_000_000_000);
            format!("{}{:010}", Utc::now().format("%y%m%d"), suffix)
        })
    }
}

/// IBAN derived from a SWIFT/BIC and an account number. BBAN is the first
/// four characters of the BIC plus the account number normalized to 10
/// digits; check digits come from the mod-97 rearrangement.
pub fn iban(swift_bic: &str, account_number: &str, country: &str) -> String {
    let bank = &swift_bic[0..4];
    let digits: String = account_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let padded = format!("{:0>10}", digits);
    let tail = &padded[padded.len() - 10..];
    let bban = format!("{}{}", bank, tail);
    let rem = iban_mod97(&format!("{}{}00", bban, country));
    let check = 98 - rem;
    format!("{}{:02}{}", country, check, bban)
}

/// ABA check digit over the first 8 digits of a routing number, weights
/// 3-7-1 repeating.
pub fn aba_check_digit(first8: &str) -> u32 {
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = first8
        .chars()
        .zip(WEIGHTS)
        .map(|(c, w)| c.to_digit(10).unwrap_or(0) * w)
        .sum();
    (10 - sum % 10) % 10
}

/// Standard Luhn check digit for the given payload digits.
pub fn luhn_check_digit(payload: &str) -> u32 {
    let sum: u32 = payload
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

/// mod-97 over an IBAN-style string with letters mapped A=10 .. Z=35.
pub fn iban_mod97(s: &str) -> u32 {
    let mut rem: u32 = 0;
    for c in s.chars() {
        if let Some(d) = c.to_digit(10) {
            rem = (rem * 10 + d) % 97;
        } else if c.is_ascii_uppercase() {
            let v = c as u32 - 'A' as u32 + 10;
            rem = (rem * 100 + v) % 97;
        }
    }
    rem
}

/// A full IBAN is valid when the mod-97 of the rearranged string is 1.
pub fn iban_valid(iban: &str) -> bool {
    if iban.len() < 5 {
        return false;
    }
    let rearranged = format!("{}{}", &iban[4..], &iban[0..4]);
    iban_mod97(&rearranged) == 1
}

pub fn is_weak_pin(pin: &str) -> bool {
    let digits: Vec<i32> = pin.chars().filter_map(|c| c.to_digit(10)).map(|d| d as i32).collect();
    if digits.len() != 4 {
        return true;
    }
    let all_same = digits.windows(2).all(|w| w[0] == w[1]);
    let ascending = digits.windows(2).all(|w| w[1] - w[0] == 1);
    let descending = digits.windows(2).all(|w| w[0] - w[1] == 1);
    all_same || ascending || descending
}

fn random_digits(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| char::from(b'0' + rng.gen_range(0..10) as u8)).collect()
}

fn retry_unique(
    set: &mut HashSet<String>,
    kind: &'static str,
    attempts: usize,
    mut generate: impl FnMut() -> String,
) -> EngineResult<String> {
    for _ in 0..attempts {
        let candidate = generate();
        if set.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }
    Err(EngineError::Exhaustion(kind))
}
