mod common;

use common::*;
use lend_adapter::{AdapterError, LimitMode, PoolId, Protocol, Role, U256};

const PROTOCOLS: [Protocol; 2] = [Protocol::V2, Protocol::V3];

#[test]
fn absolute_cap_of_two_bounds_a_request_of_ten() {
    for protocol in PROTOCOLS {
        let fx = Fixture::new(protocol);
        fx.adapter
            .set_absolute_cap(RISK_OPERATOR, usdc_pool(), units(2))
            .unwrap();
        assert_eq!(fx.adapter.absolute_cap(&usdc_pool()), units(2));
        assert_eq!(
            fx.adapter.resolve_allowed_amount(&usdc_pool(), units(10)).unwrap(),
            units(2)
        );

        let codes = fx
            .adapter
            .deposit_some_codes(VAULT, USDC, REGISTRY, units(10))
            .unwrap();
        check_deposit_codes(protocol, &codes, USDC, LENDING_POOL, VAULT, units(2));
    }
}

#[test]
fn absolute_mode_returns_request_below_cap_and_never_values_pool() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter
        .set_absolute_cap(RISK_OPERATOR, usdc_pool(), units(50))
        .unwrap();
    fx.ledger.set_unreachable(true);
    for requested in [0u64, 1, 49, 50, 51, 1_000_000] {
        let got = fx
            .adapter
            .resolve_allowed_amount(&usdc_pool(), units(requested))
            .unwrap();
        assert_eq!(got, units(requested.min(50)));
    }
}

#[test]
fn uncapped_pool_deposits_full_request() {
    let fx = Fixture::new(Protocol::V3);
    let huge = U256::from(10u64).pow(U256::from(40));
    let codes = fx.adapter.deposit_some_codes(VAULT, USDC, REGISTRY, huge).unwrap();
    check_deposit_codes(Protocol::V3, &codes, USDC, LENDING_POOL, VAULT, huge);
}

#[test]
fn protocol_cap_of_ten_bps_on_100k_pool_admits_at_most_100() {
    for protocol in PROTOCOLS {
        let fx = Fixture::new(protocol);
        fx.adapter
            .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
            .unwrap();
        fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();

        for requested in [101u64, 1_000, 200_000, u64::MAX] {
            assert_eq!(
                fx.adapter
                    .resolve_allowed_amount(&usdc_pool(), units(requested))
                    .unwrap(),
                units(100)
            );
        }
        assert_eq!(
            fx.adapter.resolve_allowed_amount(&usdc_pool(), units(99)).unwrap(),
            units(99)
        );

        let codes = fx
            .adapter
            .deposit_some_codes(VAULT, USDC, REGISTRY, units(5_000))
            .unwrap();
        check_deposit_codes(protocol, &codes, USDC, LENDING_POOL, VAULT, units(100));
    }
}

#[test]
fn percentage_cap_tracks_live_pool_value() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    fx.ledger.set_liquidity(&usdc_pool(), units(250_000));
    assert_eq!(
        fx.adapter.resolve_allowed_amount(&usdc_pool(), units(1_000)).unwrap(),
        units(250)
    );
    // 999 * 10 / 10000 floors to zero
    fx.ledger.set_liquidity(&usdc_pool(), units(999));
    assert_eq!(
        fx.adapter.resolve_allowed_amount(&usdc_pool(), units(1_000)).unwrap(),
        U256::ZERO
    );
    assert!(fx
        .adapter
        .deposit_some_codes(VAULT, USDC, REGISTRY, units(1_000))
        .unwrap()
        .is_empty());
}

#[test]
fn pool_cap_of_twelve_bps_overrides_protocol_cap_for_that_pool_only() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    fx.adapter
        .set_pool_percentage_cap(RISK_OPERATOR, usdc_pool(), 12)
        .unwrap();
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();

    assert_eq!(fx.adapter.pool_percentage_cap(&usdc_pool()), 12);
    assert_eq!(fx.adapter.protocol_percentage_cap(), 10);
    assert_eq!(
        fx.adapter.resolve_allowed_amount(&usdc_pool(), units(1_000)).unwrap(),
        units(120)
    );
    assert_eq!(
        fx.adapter.resolve_allowed_amount(&dai_pool(), units(1_000)).unwrap(),
        units(100)
    );
}

#[test]
fn percentage_mode_without_any_cap_admits_nothing() {
    let fx = Fixture::new(Protocol::V2);
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    let codes = fx
        .adapter
        .deposit_some_codes(VAULT, USDC, REGISTRY, units(10))
        .unwrap();
    assert!(codes.is_empty());
}

#[test]
fn mode_toggle_restores_prior_absolute_cap() {
    let fx = Fixture::new(Protocol::V3);
    let a = &fx.adapter;
    a.set_absolute_cap(RISK_OPERATOR, usdc_pool(), units(2)).unwrap();
    a.set_limit_mode(RISK_OPERATOR, LimitMode::Percentage).unwrap();
    a.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    assert_eq!(a.resolve_allowed_amount(&usdc_pool(), units(10)).unwrap(), units(10));
    assert_eq!(a.resolve_allowed_amount(&usdc_pool(), units(500)).unwrap(), units(100));

    a.set_limit_mode(RISK_OPERATOR, LimitMode::Absolute).unwrap();
    assert_eq!(a.limit_mode(), LimitMode::Absolute);
    assert_eq!(a.absolute_cap(&usdc_pool()), units(2));
    assert_eq!(a.resolve_allowed_amount(&usdc_pool(), units(10)).unwrap(), units(2));
    // percentage settings survived too
    assert_eq!(a.protocol_percentage_cap(), 10);
}

#[test]
fn zero_request_returns_no_codes_and_touches_nothing() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();

    let before = fx.ledger.queries();
    let codes = fx
        .adapter
        .deposit_some_codes(VAULT, USDC, REGISTRY, U256::ZERO)
        .unwrap();
    assert!(codes.is_empty());
    assert_eq!(fx.ledger.queries(), before);
}

#[test]
fn deposit_all_uses_beneficiary_balance_then_caps_it() {
    for protocol in PROTOCOLS {
        let fx = Fixture::new(protocol);
        fx.ledger.set_balance(USDC, VAULT, units(10));
        let codes = fx.adapter.deposit_all_codes(VAULT, USDC, REGISTRY).unwrap();
        check_deposit_codes(protocol, &codes, USDC, LENDING_POOL, VAULT, units(10));

        fx.adapter
            .set_absolute_cap(RISK_OPERATOR, usdc_pool(), units(4))
            .unwrap();
        let codes = fx.adapter.deposit_all_codes(VAULT, USDC, REGISTRY).unwrap();
        check_deposit_codes(protocol, &codes, USDC, LENDING_POOL, VAULT, units(4));

        fx.ledger.set_balance(USDC, VAULT, U256::ZERO);
        assert!(fx.adapter.deposit_all_codes(VAULT, USDC, REGISTRY).unwrap().is_empty());
    }
}

#[test]
fn non_risk_operator_setters_fail_and_leave_configuration_unchanged() {
    let fx = Fixture::new(Protocol::V3);
    let a = &fx.adapter;
    a.set_absolute_cap(RISK_OPERATOR, usdc_pool(), units(2)).unwrap();
    a.set_pool_percentage_cap(RISK_OPERATOR, usdc_pool(), 12).unwrap();
    a.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    let before = a.limits();

    for caller in [ALICE, OPERATOR] {
        let results = [
            a.set_limit_mode(caller, LimitMode::Percentage),
            a.set_absolute_cap(caller, usdc_pool(), units(99)),
            a.set_pool_percentage_cap(caller, usdc_pool(), 50),
            a.set_protocol_percentage_cap(caller, 50),
        ];
        for r in results {
            assert!(matches!(
                r,
                Err(AdapterError::Unauthorized { role: Role::RiskOperator, caller: c }) if c == caller
            ));
        }
    }
    assert_eq!(a.limits(), before);
}

#[test]
fn every_setter_consults_the_registry() {
    let fx = Fixture::new(Protocol::V3);
    let before = fx.registry.calls();
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 1).unwrap();
    assert_eq!(fx.registry.calls(), before + 2);
}

#[test]
fn revoked_risk_operator_is_rejected_on_next_call() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    fx.registry.set_risk_operator(ALICE);
    assert!(fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 20).is_err());
    fx.adapter.set_protocol_percentage_cap(ALICE, 20).unwrap();
    assert_eq!(fx.adapter.protocol_percentage_cap(), 20);
}

#[test]
fn out_of_range_caps_are_rejected_atomically() {
    let fx = Fixture::new(Protocol::V3);
    let a = &fx.adapter;
    a.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    assert!(matches!(
        a.set_protocol_percentage_cap(RISK_OPERATOR, 10_001),
        Err(AdapterError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        a.set_pool_percentage_cap(RISK_OPERATOR, usdc_pool(), u16::MAX),
        Err(AdapterError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        a.set_absolute_cap(RISK_OPERATOR, PoolId::new(REGISTRY, lend_adapter::Address::ZERO), units(1)),
        Err(AdapterError::InvalidConfiguration(_))
    ));
    assert_eq!(a.protocol_percentage_cap(), 10);
    assert_eq!(a.pool_percentage_cap(&usdc_pool()), 0);
    // full range is accepted
    a.set_pool_percentage_cap(RISK_OPERATOR, usdc_pool(), 10_000).unwrap();
}

#[test]
fn valuation_failure_surfaces_as_external_query_error() {
    let fx = Fixture::new(Protocol::V3);
    fx.adapter
        .set_limit_mode(RISK_OPERATOR, LimitMode::Percentage)
        .unwrap();
    fx.adapter.set_protocol_percentage_cap(RISK_OPERATOR, 10).unwrap();
    fx.ledger.set_unreachable(true);
    assert!(matches!(
        fx.adapter.deposit_some_codes(VAULT, USDC, REGISTRY, units(10)),
        Err(AdapterError::ExternalQuery(_))
    ));
}

#[test]
fn registry_outage_blocks_setters() {
    let fx = Fixture::new(Protocol::V3);
    fx.registry.set_unreachable(true);
    assert!(matches!(
        fx.adapter.set_limit_mode(RISK_OPERATOR, LimitMode::Percentage),
        Err(AdapterError::ExternalQuery(_))
    ));
    assert_eq!(fx.adapter.limit_mode(), LimitMode::Absolute);
}
