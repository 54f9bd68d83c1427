//! Integration tests for the Diesel adapters against a live PostgreSQL.
//!
//! Set `LEDGER_TEST_DATABASE_URL` to a disposable database to run them; each
//! test migrates the schema and truncates both tables first. Without the
//! variable the tests return early.

use std::sync::Arc;
use std::time::Duration;

use diesel_async::RunQueryDsl;
use ledger::domain::ports::{
    AccountRegistry, RegistrationRequest, TransferEngine, TransferRequest,
};
use ledger::domain::{
    AccountId, AccountRegistryService, AccountRole, LedgerError, TransferService,
};
use ledger::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselTransferRepository, PoolConfig, migrate,
};
use ledger::test_support::SteppingClock;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

const DATABASE_URL_VAR: &str = "LEDGER_TEST_DATABASE_URL";

/// Serialises tests sharing the database.
static DATABASE: Mutex<()> = Mutex::const_new(());

struct Ledger {
    registry: AccountRegistryService<DieselAccountRepository>,
    engine: Arc<TransferService<DieselTransferRepository>>,
    clock: Arc<SteppingClock>,
}

async fn ledger() -> Option<Ledger> {
    let Ok(database_url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("{DATABASE_URL_VAR} not set; skipping PostgreSQL test");
        return None;
    };
    migrate(database_url.clone())
        .await
        .expect("migrations apply");
    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(8)
            .with_min_idle(Some(1))
            .with_storage_timeout(Duration::from_secs(10)),
    )
    .await
    .expect("pool builds");
    {
        let mut conn = pool.get().await.expect("connection checkout");
        diesel::sql_query("TRUNCATE transfers, accounts RESTART IDENTITY")
            .execute(&mut conn)
            .await
            .expect("tables truncate");
    }

    let clock = Arc::new(SteppingClock::default());
    Some(Ledger {
        registry: AccountRegistryService::new(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            clock.clone(),
        ),
        engine: Arc::new(TransferService::new(
            Arc::new(DieselTransferRepository::new(pool)),
            clock.clone(),
        )),
        clock,
    })
}

async fn open(ledger: &Ledger, email: &str, balance: Decimal) -> AccountId {
    ledger
        .registry
        .register(RegistrationRequest {
            name: email.to_owned(),
            email: email.to_owned(),
            balance,
        })
        .await
        .expect("registration succeeds")
        .id()
}

async fn balance(ledger: &Ledger, id: AccountId) -> Decimal {
    ledger
        .registry
        .list()
        .await
        .expect("list succeeds")
        .into_iter()
        .find(|account| account.id() == id)
        .map(|account| account.balance().as_decimal())
        .expect("account listed")
}

#[rstest]
#[tokio::test]
async fn transfer_commits_both_balances_and_the_record() {
    let _db = DATABASE.lock().await;
    let Some(ledger) = ledger().await else { return };
    let alice = open(&ledger, "alice@x.com", dec!(100)).await;
    let bob = open(&ledger, "bob@x.com", dec!(50)).await;

    let transfer = ledger
        .engine
        .transfer(TransferRequest {
            from: alice,
            to: bob,
            amount: dec!(40),
        })
        .await
        .expect("transfer commits");

    assert_eq!(transfer.amount().as_decimal(), dec!(40));
    assert_eq!(balance(&ledger, alice).await, dec!(60));
    assert_eq!(balance(&ledger, bob).await, dec!(90));
}

#[rstest]
#[tokio::test]
async fn rejected_transfers_roll_back() {
    let _db = DATABASE.lock().await;
    let Some(ledger) = ledger().await else { return };
    let carol = open(&ledger, "carol@x.com", dec!(10)).await;
    let bob = open(&ledger, "bob@x.com", dec!(50)).await;

    let insufficient = ledger
        .engine
        .transfer(TransferRequest {
            from: carol,
            to: bob,
            amount: dec!(50),
        })
        .await
        .expect_err("insufficient funds");
    let missing = ledger
        .engine
        .transfer(TransferRequest {
            from: AccountId::new(9999),
            to: bob,
            amount: dec!(1),
        })
        .await
        .expect_err("unknown source");

    assert_eq!(insufficient, LedgerError::InsufficientFunds);
    assert_eq!(
        missing,
        LedgerError::AccountNotFound {
            role: AccountRole::Source,
            id: AccountId::new(9999)
        }
    );
    assert_eq!(balance(&ledger, carol).await, dec!(10));
    assert_eq!(balance(&ledger, bob).await, dec!(50));
}

#[rstest]
#[tokio::test]
async fn duplicate_email_hits_the_unique_constraint() {
    let _db = DATABASE.lock().await;
    let Some(ledger) = ledger().await else { return };
    open(&ledger, "a@x.com", dec!(1)).await;

    let err = ledger
        .registry
        .register(RegistrationRequest {
            name: "Other".to_owned(),
            email: "a@x.com".to_owned(),
            balance: dec!(2),
        })
        .await
        .expect_err("duplicate rejected");

    assert_eq!(
        err,
        LedgerError::DuplicateIdentity {
            identity_key: "a@x.com".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn listing_is_newest_first_with_id_tie_break() {
    let _db = DATABASE.lock().await;
    let Some(ledger) = ledger().await else { return };
    let first = open(&ledger, "first@x.com", dec!(1)).await;
    let tied = open(&ledger, "tied@x.com", dec!(1)).await;
    ledger.clock.advance_seconds(1);
    let newest = open(&ledger, "newest@x.com", dec!(1)).await;

    let ids: Vec<AccountId> = ledger
        .registry
        .list()
        .await
        .expect("list succeeds")
        .iter()
        .map(|account| account.id())
        .collect();

    assert_eq!(ids, vec![newest, tied, first]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_opposing_transfers_conserve_funds() {
    let _db = DATABASE.lock().await;
    let Some(ledger) = ledger().await else { return };
    let alice = open(&ledger, "alice@x.com", dec!(100)).await;
    let bob = open(&ledger, "bob@x.com", dec!(100)).await;

    let handles: Vec<_> = (0..20)
        .map(|round| {
            let engine = ledger.engine.clone();
            let (from, to) = if round % 2 == 0 { (alice, bob) } else { (bob, alice) };
            tokio::spawn(async move {
                engine
                    .transfer(TransferRequest {
                        from,
                        to,
                        amount: dec!(12.3456),
                    })
                    .await
            })
        })
        .collect();
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(_) | Err(LedgerError::InsufficientFunds) => {}
            Err(other) => panic!("unexpected transfer failure: {other}"),
        }
    }

    let total = balance(&ledger, alice).await + balance(&ledger, bob).await;
    assert_eq!(total, dec!(200));
}
