use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::assets::{AssetKind, HoldingSpec};
use crate::holdings::{
    Holding, HoldingError, HoldingRepositoryTrait, HoldingWithAsset,
    Result as HoldingResult,
};
use crate::portfolio::portfolio_errors::PortfolioError;
use crate::portfolio::portfolio_service::PortfolioService;
use crate::pricing::{
    PriceError, PricePoint, PriceRepositoryTrait, Result as PriceResult,
};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, n).unwrap()
}

fn point(asset_id: &str, date: NaiveDate, price: Decimal) -> PricePoint {
    PricePoint {
        id: format!("pp-{}-{}", asset_id, date),
        asset_id: asset_id.to_string(),
        price,
        recorded_date: date,
        created_at: chrono::Utc::now().naive_utc(),
    }
}

fn holding(
    id: &str,
    user_id: &str,
    asset_id: &str,
    kind: AssetKind,
    quantity: Option<Decimal>,
) -> HoldingWithAsset {
    let now = chrono::Utc::now().naive_utc();
    HoldingWithAsset {
        id: id.to_string(),
        user_id: user_id.to_string(),
        asset_id: asset_id.to_string(),
        quantity,
        created_at: now,
        name: format!("Asset {}", asset_id),
        asset_kind: kind,
        description: None,
        contract_address: format!("0x{}", asset_id),
        chain: "ethereum".to_string(),
        token_id: match kind {
            AssetKind::Unique => Some("1".to_string()),
            AssetKind::Fungible => None,
        },
        asset_created_at: now,
    }
}

#[derive(Default)]
struct MockHoldingRepository {
    holdings: Vec<HoldingWithAsset>,
}

impl HoldingRepositoryTrait for MockHoldingRepository {
    fn insert(
        &self,
        _user_id: &str,
        _asset_id: &str,
        _spec: &HoldingSpec,
    ) -> HoldingResult<Holding> {
        unreachable!("read-path tests never insert")
    }

    fn list_for_user(&self, user_id: &str) -> HoldingResult<Vec<HoldingWithAsset>> {
        Ok(self
            .holdings
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_for_user(&self, holding_id: &str, user_id: &str) -> HoldingResult<HoldingWithAsset> {
        self.holdings
            .iter()
            .find(|h| h.id == holding_id && h.user_id == user_id)
            .cloned()
            .ok_or_else(|| {
                HoldingError::NotFound(format!(
                    "Holding {} not found in user's portfolio",
                    holding_id
                ))
            })
    }

    fn delete(&self, _holding_id: &str, _user_id: &str) -> HoldingResult<usize> {
        unreachable!("read-path tests never delete")
    }
}

#[derive(Default)]
struct MockPriceRepository {
    points: HashMap<String, Vec<PricePoint>>,
    calls: AtomicUsize,
    fail_lookups: bool,
}

impl MockPriceRepository {
    fn with_series(series: Vec<PricePoint>) -> Self {
        let mut points: HashMap<String, Vec<PricePoint>> = HashMap::new();
        for p in series {
            points.entry(p.asset_id.clone()).or_default().push(p);
        }
        for series in points.values_mut() {
            series.sort_by_key(|p| p.recorded_date);
        }
        Self {
            points,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail_lookups: true,
            ..Default::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> PriceResult<()> {
        if self.fail_lookups {
            Err(PriceError::DatabaseError("price store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PriceRepositoryTrait for MockPriceRepository {
    fn append(
        &self,
        _asset_id: &str,
        _recorded_date: NaiveDate,
        _price: Decimal,
    ) -> PriceResult<PricePoint> {
        unreachable!("read-path tests never append")
    }

    fn latest(&self, asset_id: &str) -> PriceResult<Option<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .points
            .get(asset_id)
            .and_then(|series| series.last())
            .cloned())
    }

    fn earliest(&self, asset_id: &str) -> PriceResult<Option<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .points
            .get(asset_id)
            .and_then(|series| series.first())
            .cloned())
    }

    fn series(
        &self,
        asset_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> PriceResult<Vec<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .points
            .get(asset_id)
            .map(|series| {
                series
                    .iter()
                    .filter(|p| start_date.map_or(true, |s| p.recorded_date >= s))
                    .filter(|p| end_date.map_or(true, |e| p.recorded_date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn service(
    holdings: Vec<HoldingWithAsset>,
    prices: Arc<MockPriceRepository>,
) -> PortfolioService {
    PortfolioService::new(
        Arc::new(MockHoldingRepository { holdings }),
        prices,
    )
}

#[tokio::test]
async fn empty_portfolio_returns_zeros_without_store_calls() {
    let prices = Arc::new(MockPriceRepository::default());
    let service = service(vec![], Arc::clone(&prices));

    let summary = service.get_portfolio_summary("user-1").await.unwrap();

    assert_eq!(summary.total_value, Decimal::ZERO);
    assert_eq!(summary.pnl, Decimal::ZERO);
    assert_eq!(summary.pnl_percentage, Decimal::ZERO);
    assert_eq!(prices.call_count(), 0);
}

#[tokio::test]
async fn single_fungible_holding_doubles_in_value() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-1", day(1), dec!(50)),
        point("asset-1", day(10), dec!(100)),
    ]));
    let service = service(
        vec![holding(
            "h-1",
            "user-1",
            "asset-1",
            AssetKind::Fungible,
            Some(dec!(10)),
        )],
        prices,
    );

    let summary = service.get_portfolio_summary("user-1").await.unwrap();

    assert_eq!(summary.total_value, dec!(1000.00));
    assert_eq!(summary.pnl, dec!(500.00));
    assert_eq!(summary.pnl_percentage, dec!(100.00));
}

#[tokio::test]
async fn unique_holding_contributes_with_quantity_one() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-nft", day(1), dec!(200)),
        point("asset-nft", day(5), dec!(300)),
    ]));
    let service = service(
        vec![holding("h-1", "user-1", "asset-nft", AssetKind::Unique, None)],
        prices,
    );

    let summary = service.get_portfolio_summary("user-1").await.unwrap();

    assert_eq!(summary.total_value, dec!(300.00));
    assert_eq!(summary.pnl, dec!(100.00));
    assert_eq!(summary.pnl_percentage, dec!(50.00));
}

#[tokio::test]
async fn priceless_holding_is_skipped_not_fatal() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-1", day(1), dec!(50)),
        point("asset-1", day(10), dec!(100)),
    ]));
    let service = service(
        vec![
            holding("h-1", "user-1", "asset-1", AssetKind::Fungible, Some(dec!(10))),
            holding("h-2", "user-1", "asset-ghost", AssetKind::Fungible, Some(dec!(5))),
        ],
        prices,
    );

    let summary = service.get_portfolio_summary("user-1").await.unwrap();

    // The priceless holding contributes zero to both sides of the reduction.
    assert_eq!(summary.total_value, dec!(1000.00));
    assert_eq!(summary.pnl, dec!(500.00));
    assert_eq!(summary.pnl_percentage, dec!(100.00));
}

#[tokio::test]
async fn aggregation_sums_across_holdings() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-1", day(1), dec!(50)),
        point("asset-1", day(10), dec!(100)),
        point("asset-2", day(1), dec!(10)),
        point("asset-2", day(10), dec!(8)),
    ]));
    let service = service(
        vec![
            holding("h-1", "user-1", "asset-1", AssetKind::Fungible, Some(dec!(10))),
            holding("h-2", "user-1", "asset-2", AssetKind::Fungible, Some(dec!(100))),
        ],
        prices,
    );

    let summary = service.get_portfolio_summary("user-1").await.unwrap();

    // value = 1000 + 800, cost = 500 + 1000
    assert_eq!(summary.total_value, dec!(1800.00));
    assert_eq!(summary.pnl, dec!(300.00));
    assert_eq!(summary.pnl_percentage, dec!(20.00));
}

#[tokio::test]
async fn store_failure_aborts_whole_aggregation() {
    let prices = Arc::new(MockPriceRepository::failing());
    let service = service(
        vec![holding(
            "h-1",
            "user-1",
            "asset-1",
            AssetKind::Fungible,
            Some(dec!(10)),
        )],
        prices,
    );

    let result = service.get_portfolio_summary("user-1").await;

    assert!(matches!(result, Err(PortfolioError::Aggregation(_))));
}

#[tokio::test]
async fn fungible_holding_without_quantity_is_rejected() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-1", day(1), dec!(50)),
        point("asset-1", day(10), dec!(100)),
    ]));
    let service = service(
        vec![holding("h-1", "user-1", "asset-1", AssetKind::Fungible, None)],
        prices,
    );

    let result = service.get_portfolio_summary("user-1").await;

    assert!(result.is_err());
}

#[test]
fn holding_history_applies_date_bounds() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![
        point("asset-1", day(1), dec!(100)),
        point("asset-1", day(2), dec!(110)),
        point("asset-1", day(3), dec!(105)),
    ]));
    let service = service(
        vec![holding(
            "h-1",
            "user-1",
            "asset-1",
            AssetKind::Fungible,
            Some(dec!(10)),
        )],
        prices,
    );

    let history = service
        .get_holding_history("user-1", "h-1", Some(day(2)), None)
        .unwrap();

    assert_eq!(history.history.len(), 2);
    assert_eq!(history.history[0].price, "110.000000");
    // Day 2 is the first in-range point, so PnL restarts from it.
    assert_eq!(history.overall_pnl, dec!(-50));
}

#[test]
fn holding_history_for_unknown_holding_is_not_found() {
    let prices = Arc::new(MockPriceRepository::default());
    let service = service(vec![], prices);

    let result = service.get_holding_history("user-1", "h-404", None, None);

    assert!(matches!(
        result,
        Err(PortfolioError::Holding(HoldingError::NotFound(_)))
    ));
}

#[test]
fn holding_history_empty_range_reports_quantity() {
    let prices = Arc::new(MockPriceRepository::with_series(vec![point(
        "asset-1",
        day(1),
        dec!(100),
    )]));
    let service = service(
        vec![holding(
            "h-1",
            "user-1",
            "asset-1",
            AssetKind::Fungible,
            Some(dec!(10)),
        )],
        prices,
    );

    let history = service
        .get_holding_history("user-1", "h-1", Some(day(5)), Some(day(9)))
        .unwrap();

    assert!(history.history.is_empty());
    assert_eq!(history.overall_pnl, Decimal::ZERO);
    assert_eq!(history.overall_pnl_percentage, Decimal::ZERO);
    assert_eq!(history.quantity, "10.000000");
}
