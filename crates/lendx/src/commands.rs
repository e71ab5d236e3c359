use colored::Colorize;
use lend_adapter::policy::Cap;
use lend_adapter::{
    admissible_amount, decode_call, Address, CallEncoder, Instruction, LimitConfig, PoolId,
    Protocol, U256,
};
use std::fs;
use std::io::{self, Read};
use std::str::FromStr;
use tracing::debug;

pub fn protocol(s: &str) -> Result<Protocol, String> {
    s.parse().map_err(|e| format!("parse protocol: {e}"))
}

fn address(field: &str, s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|e| format!("parse {field}: {e}"))
}

fn amount(field: &str, s: &str) -> Result<U256, String> {
    U256::from_str(s.trim()).map_err(|e| format!("parse {field}: {e}"))
}

fn print_codes(codes: &[Instruction]) {
    for (i, ix) in codes.iter().enumerate() {
        let call = decode_call(ix)
            .map(|c| c.to_string())
            .unwrap_or_else(|_| "?".into());
        println!(
            "{} {} {}",
            format!("[{i}]").dimmed(),
            ix.target.to_string().cyan(),
            call.bold()
        );
        println!("    {}", ix.to_hex());
    }
}

// ── deposit / withdraw ──────────────────────────────────────────

pub fn deposit(
    protocol: Protocol,
    token: &str,
    pool: &str,
    beneficiary: &str,
    value: &str,
) -> Result<(), String> {
    let token = address("token", token)?;
    let pool = address("pool", pool)?;
    let beneficiary = address("beneficiary", beneficiary)?;
    let value = amount("amount", value)?;
    debug!(%protocol, %token, %pool, %value, "encoding deposit");

    let codes = CallEncoder::new(protocol).encode_deposit(token, pool, beneficiary, value);
    print_codes(&codes);
    Ok(())
}

pub fn withdraw(
    protocol: Protocol,
    lp_token: &str,
    pool: &str,
    token: &str,
    beneficiary: &str,
    value: &str,
) -> Result<(), String> {
    let lp_token = address("lp-token", lp_token)?;
    let pool = address("pool", pool)?;
    let token = address("token", token)?;
    let beneficiary = address("beneficiary", beneficiary)?;
    let value = amount("amount", value)?;
    debug!(%protocol, %lp_token, %pool, %value, "encoding withdraw");

    let codes = CallEncoder::new(protocol).encode_withdraw(lp_token, pool, token, beneficiary, value);
    print_codes(&codes);
    Ok(())
}

// ── decode ──────────────────────────────────────────────────────

pub fn decode(code: &str) -> Result<(), String> {
    let raw = if code == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("read stdin: {e}"))?;
        buf
    } else {
        code.to_string()
    };
    let ix = Instruction::from_hex(&raw).map_err(|e| e.to_string())?;
    let selector = ix
        .selector()
        .map(|s| format!("0x{}", hex::encode(s)))
        .unwrap_or_else(|| "-".into());
    let call = decode_call(&ix).map_err(|e| e.to_string())?;

    println!("{} {}", "Target:  ".dimmed(), ix.target.to_string().cyan());
    println!("{} {}", "Selector:".dimmed(), selector);
    println!("{} {}", "Call:    ".dimmed(), call.to_string().bold());
    Ok(())
}

// ── limit ───────────────────────────────────────────────────────

pub fn limit(
    limits_path: &str,
    registry: &str,
    token: &str,
    pool_value: &str,
    requested: &str,
) -> Result<(), String> {
    let raw = fs::read_to_string(limits_path).map_err(|e| format!("read limits: {e}"))?;
    let config: LimitConfig =
        serde_json::from_str(&raw).map_err(|e| format!("parse limits: {e}"))?;
    let pool = PoolId::new(address("registry", registry)?, address("token", token)?);
    let value = amount("pool-value", pool_value)?;
    let requested = amount("amount", requested)?;

    let admissible = admissible_amount(&config, &pool, requested, || Ok(value))
        .map_err(|e| e.to_string())?;

    let rule = match config.cap_for(&pool) {
        Cap::Amount(max) if max == U256::MAX => "absolute (unconstrained)".to_string(),
        Cap::Amount(max) => format!("absolute {max}"),
        Cap::Bps(bps) => format!("percentage {bps} bps of {value}"),
    };
    println!("{} {}", "Mode:      ".dimmed(), config.mode());
    println!("{} {}", "Rule:      ".dimmed(), rule);
    println!("{} {}", "Requested: ".dimmed(), requested);
    let badge = if admissible == requested {
        admissible.to_string().green().bold()
    } else {
        admissible.to_string().yellow().bold()
    };
    println!("{} {}", "Admissible:".dimmed(), badge);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_decimal_and_hex() {
        assert_eq!(amount("a", "1000").unwrap(), U256::from(1000));
        assert_eq!(amount("a", "0x10").unwrap(), U256::from(16));
        assert!(amount("a", "ten").unwrap_err().starts_with("parse a"));
    }

    #[test]
    fn address_errors_name_the_field() {
        assert!(address("pool", "0x1234").unwrap_err().starts_with("parse pool"));
        assert!(address("pool", "0x794a61358d6845594f94dc1db02a252b5b4814ad").is_ok());
    }

    #[test]
    fn protocol_rejects_unknown() {
        assert_eq!(protocol("v2").unwrap(), Protocol::V2);
        assert!(protocol("v5").is_err());
    }
}
