//! Tests for the engine binding

use std::sync::Arc;

use zwallet_core::engine::{self, LocalEngine, WalletEngine};
use zwallet_core::{AccountId, EngineConfig, EngineError, Network, Pool, Seed};

const ENDPOINT: &str = "127.0.0.1:0";

#[test]
fn test_acquire_yields_independent_handles() -> anyhow::Result<()> {
    let engine = LocalEngine::new(Network::Test);

    let first = engine.acquire(&[0u8; 32], ENDPOINT)?;
    let second = engine.acquire(&[0u8; 32], ENDPOINT)?;
    assert_ne!(first.raw(), second.raw());
    assert_eq!(engine.live_handles(), 2);

    engine.create_account(&first, "only in first")?;
    assert_eq!(engine.list_accounts(&first)?, vec!["only in first"]);
    assert!(engine.list_accounts(&second)?.is_empty());

    engine.release(first)?;
    assert_eq!(engine.live_handles(), 1);

    // The other wallet is untouched
    engine.create_account(&second, "still here")?;
    assert_eq!(engine.list_accounts(&second)?, vec!["still here"]);

    engine.release(second)?;
    assert_eq!(engine.live_handles(), 0);
    Ok(())
}

#[test]
fn test_release_of_unknown_handle_fails() {
    let engine = LocalEngine::new(Network::Test);
    let handle = engine.acquire(&[1u8; 32], ENDPOINT).unwrap();
    let raw = handle.raw();
    engine.release(handle).unwrap();

    let stale = zwallet_core::WalletHandle::from_raw(raw);
    assert_eq!(engine.release(stale), Err(EngineError::InvalidHandle(raw)));

    let never_issued = zwallet_core::WalletHandle::from_raw(u64::MAX);
    assert_eq!(
        engine.create_account(&never_issued, "x"),
        Err(EngineError::InvalidHandle(u64::MAX))
    );
}

#[test]
fn test_accounts_are_listed_in_creation_order() -> anyhow::Result<()> {
    let engine = LocalEngine::new(Network::Test);
    let handle = engine.acquire(&[0u8; 32], ENDPOINT)?;

    let labels = ["spending", "savings", "donations", "spending"];
    for (i, label) in labels.iter().enumerate() {
        assert_eq!(engine.create_account(&handle, label)?, AccountId(i as u32));
    }
    assert_eq!(engine.list_accounts(&handle)?, labels);

    engine.release(handle)?;
    Ok(())
}

#[test]
fn test_index_bounds() -> anyhow::Result<()> {
    let engine = LocalEngine::new(Network::Test);
    let handle = engine.acquire(&[0u8; 32], ENDPOINT)?;
    engine.create_account(&handle, "a1")?;
    engine.create_account(&handle, "a2")?;

    for i in 0..2 {
        assert!(!engine.default_address(&handle, AccountId(i))?.is_empty());
        assert_eq!(engine.balances(&handle, AccountId(i))?, vec![0, 0]);
    }

    let unknown = EngineError::UnknownAccount { index: 2, count: 2 };
    assert_eq!(engine.default_address(&handle, AccountId(2)), Err(unknown.clone()));
    assert_eq!(engine.balances(&handle, AccountId(2)), Err(unknown));

    engine.release(handle)?;
    Ok(())
}

#[test]
fn test_addresses_depend_on_seed_and_network() -> anyhow::Result<()> {
    let seed = Seed::random();
    let test_engine = LocalEngine::new(Network::Test);
    let main_engine = LocalEngine::new(Network::Main);

    let mut addresses = Vec::new();
    for engine in [&test_engine, &test_engine, &main_engine] {
        let handle = engine.acquire(seed.as_ref(), ENDPOINT)?;
        engine.create_account(&handle, "default")?;
        addresses.push(engine.default_address(&handle, AccountId(0))?);
        engine.release(handle)?;
    }

    // Same seed, same network: same address
    assert_eq!(addresses[0], addresses[1]);
    assert!(addresses[0].starts_with("ztestsapling1"));
    assert!(addresses[2].starts_with("zs1"));

    let other = test_engine.acquire(Seed::random().as_ref(), ENDPOINT)?;
    test_engine.create_account(&other, "default")?;
    assert_ne!(test_engine.default_address(&other, AccountId(0))?, addresses[0]);
    test_engine.release(other)?;
    Ok(())
}

#[test]
fn test_delivered_notes_show_up_in_balances() -> anyhow::Result<()> {
    let engine = LocalEngine::new(Network::Test);
    let handle = engine.acquire(&[0u8; 32], ENDPOINT)?;
    engine.create_account(&handle, "a1")?;
    engine.create_account(&handle, "a2")?;
    let a1 = engine.default_address(&handle, AccountId(0))?;
    let a2 = engine.default_address(&handle, AccountId(1))?;

    assert_eq!(engine.deliver(&a1, Pool::Sapling, 150_000_000)?, 1);
    assert_eq!(engine.deliver(&a1, Pool::Transparent, 20_000)?, 1);
    assert_eq!(engine.deliver(&a2, Pool::Sapling, 1)?, 1);

    assert_eq!(engine.balances(&handle, AccountId(0))?, vec![20_000, 150_000_000]);
    assert_eq!(engine.balances(&handle, AccountId(1))?, vec![0, 1]);

    assert!(matches!(
        engine.deliver(&a1, Pool::Sapling, u64::MAX),
        Err(EngineError::AmountOutOfRange(_))
    ));
    assert_eq!(engine.balances(&handle, AccountId(0))?, vec![20_000, 150_000_000]);

    engine.release(handle)?;

    // Nobody holds the key any more
    assert_eq!(engine.deliver(&a1, Pool::Sapling, 1)?, 0);
    Ok(())
}

#[test]
fn test_delivery_reaches_every_wallet_holding_the_address() -> anyhow::Result<()> {
    let engine = LocalEngine::new(Network::Test);
    let first = engine.acquire(&[3u8; 32], ENDPOINT)?;
    let second = engine.acquire(&[3u8; 32], ENDPOINT)?;
    engine.create_account(&first, "mine")?;
    engine.create_account(&second, "also mine")?;

    let address = engine.default_address(&first, AccountId(0))?;
    assert_eq!(engine.deliver(&address, Pool::Sapling, 500)?, 2);
    assert_eq!(engine.balances(&second, AccountId(0))?, vec![0, 500]);

    engine.release(first)?;
    engine.release(second)?;
    Ok(())
}

#[test]
fn test_delivery_rejects_foreign_addresses() -> anyhow::Result<()> {
    let main = LocalEngine::new(Network::Main);
    let test = LocalEngine::new(Network::Test);

    let handle = main.acquire(&[0u8; 32], ENDPOINT)?;
    main.create_account(&handle, "main")?;
    let address = main.default_address(&handle, AccountId(0))?;

    assert!(matches!(
        test.deliver(&address, Pool::Sapling, 1),
        Err(EngineError::Address(_))
    ));
    assert!(main.deliver("not an address", Pool::Sapling, 1).is_err());

    main.release(handle)?;
    Ok(())
}

/// Known-answer check: the zero seed must derive a testnet address
fn expect_testnet_address(engine: &LocalEngine) -> zwallet_core::Result<()> {
    let handle = engine.acquire(&[0u8; 32], ENDPOINT)?;
    engine.create_account(&handle, "check")?;
    let address = engine.default_address(&handle, AccountId(0))?;
    engine.release(handle)?;

    if !address.starts_with("ztestsapling1") {
        return Err(EngineError::Address(format!("unexpected address {}", address)));
    }
    Ok(())
}

// The only test in this file that touches the process-wide engine
#[test]
fn test_process_wide_load_returns_one_engine() -> anyhow::Result<()> {
    // A failed load caches nothing
    let failed = engine::load_checked(EngineConfig::new(Network::Main), expect_testnet_address);
    assert!(matches!(failed, Err(EngineError::EngineUnavailable(_))));

    let first = engine::load_checked(EngineConfig::default(), expect_testnet_address)?;
    assert_eq!(first.network(), Network::Test);
    assert_eq!(first.live_handles(), 0);

    // The second configuration is ignored once an engine is loaded
    let second = engine::load(EngineConfig::new(Network::Main))?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.network(), Network::Test);

    // So is the check
    let third = engine::load_checked(EngineConfig::default(), |_| {
        Err(EngineError::EngineUnavailable("not run".to_string()))
    })?;
    assert!(Arc::ptr_eq(&first, &third));
    Ok(())
}

#[test]
fn test_engine_is_shareable_across_threads() -> anyhow::Result<()> {
    let engine = Arc::new(LocalEngine::new(Network::Test));

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || -> zwallet_core::Result<Vec<String>> {
                let handle = engine.acquire(&[i as u8; 32], ENDPOINT)?;
                engine.create_account(&handle, &format!("worker-{}", i))?;
                let labels = engine.list_accounts(&handle)?;
                engine.release(handle)?;
                Ok(labels)
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let labels = worker.join().expect("worker panicked")?;
        assert_eq!(labels, vec![format!("worker-{}", i)]);
    }
    assert_eq!(engine.live_handles(), 0);
    Ok(())
}
