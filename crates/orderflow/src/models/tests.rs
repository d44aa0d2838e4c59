use super::{
    Accumulator, COMPLETION_THRESHOLD, Order, OrderStatus, Product, Statistics, order_total,
    round_cents,
};
use crate::Error;
use rand::Rng;
use std::collections::HashSet;
use std::thread::scope;

fn order(quantity: u32) -> Order {
    Order::with_id(format!("order-{quantity}"), Product::new("p", quantity))
}

fn cents(raw: u64) -> f64 {
    raw as f64 / 100.0
}

#[test]
fn total_is_quantity_times_unit_price_rounded() {
    for q in 0..=10_000_u32 {
        let expected = (f64::from(q) * 10.5 * 100.0).round() / 100.0;
        assert_eq!(order_total(q), expected, "quantity {q}");
        assert_eq!(order(q).total(), expected);
    }
    assert_eq!(order_total(60), 630.0);
    assert_eq!(order_total(10), 105.0);
    assert_eq!(order_total(0), 0.0);
}

#[test]
fn round_cents_rounds_half_away_from_zero() {
    assert_eq!(round_cents(1.005_000_1), 1.01);
    assert_eq!(round_cents(1.004), 1.0);
    assert_eq!(round_cents(0.125), 0.13);
    assert_eq!(round_cents(42.0), 42.0);
}

#[test]
fn new_order_starts_new_with_unique_ids() {
    let ids: HashSet<String> = (0..1_000)
        .map(|i| {
            let order = Order::new(Product::new(i.to_string(), i));
            assert_eq!(order.status(), OrderStatus::New);
            order.id().to_owned()
        })
        .collect();
    assert_eq!(ids.len(), 1_000);
}

#[test]
fn classify_uses_completion_threshold() {
    let mut big = order(60);
    assert_eq!(big.classify().unwrap(), OrderStatus::Completed);
    assert_eq!(big.status(), OrderStatus::Completed);

    let mut small = order(10);
    assert_eq!(small.classify().unwrap(), OrderStatus::Rejected);
    assert_eq!(small.status(), OrderStatus::Rejected);

    // 48 * 10.5 = 504, 47 * 10.5 = 493.5
    assert!(order_total(48) >= COMPLETION_THRESHOLD);
    assert!(order_total(47) < COMPLETION_THRESHOLD);
    assert_eq!(order(48).classify().unwrap(), OrderStatus::Completed);
    assert_eq!(order(47).classify().unwrap(), OrderStatus::Rejected);
}

#[test]
fn classify_matches_threshold_for_all_quantities() {
    for q in 0..=200 {
        let mut o = order(q);
        let status = o.classify().unwrap();
        assert_eq!(status == OrderStatus::Completed, o.total() >= 500.0);
        assert!(status.is_terminal());
    }
}

#[test]
fn terminal_status_cannot_change() {
    let mut o = order(60);
    o.complete().unwrap();

    let err = o.reject().unwrap_err();
    assert_eq!(
        err,
        Error::InvalidTransition {
            id: "order-60".to_owned(),
            from: OrderStatus::Completed,
            to: OrderStatus::Rejected,
        }
    );
    assert!(o.complete().is_err());
    assert!(o.classify().is_err());
    assert_eq!(o.status(), OrderStatus::Completed);

    let mut r = order(1);
    r.reject().unwrap();
    assert!(r.complete().is_err());
    assert_eq!(r.status(), OrderStatus::Rejected);
}

#[test]
fn per_order_statistics_follow_status() {
    let mut done = order(60);
    done.classify().unwrap();
    assert_eq!(
        Statistics::from_order(&done),
        Statistics {
            completed_orders: 1,
            rejected_orders: 0,
            revenue: 630.0,
        }
    );

    let mut rejected = order(10);
    rejected.classify().unwrap();
    assert_eq!(Statistics::from_order(&rejected), Statistics::rejected());
}

#[test]
fn combine_adds_counts_and_rounds_revenue() {
    let a = Statistics {
        completed_orders: 2,
        rejected_orders: 1,
        revenue: 1.111,
    };
    let b = Statistics {
        completed_orders: 1,
        rejected_orders: 4,
        revenue: 2.222,
    };
    let c = a.combine(b);
    assert_eq!(c.completed_orders, 3);
    assert_eq!(c.rejected_orders, 5);
    assert_eq!(c.revenue, 3.33);
    assert_eq!(c.total_orders(), 8);
    assert_eq!(a + b, c);
}

#[test]
fn combine_is_associative_and_commutative() {
    let mut rng = rand::rng();
    for _ in 0..1_000 {
        let [a, b, c]: [Statistics; 3] = core::array::from_fn(|_| Statistics {
            completed_orders: rng.random_range(0..1_000),
            rejected_orders: rng.random_range(0..1_000),
            revenue: cents(rng.random_range(0..10_000_000)),
        });
        assert_eq!(a.combine(b), b.combine(a));
        assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
        assert_eq!(a.combine(Statistics::ZERO), a);
    }
}

#[test]
fn sum_folds_with_combine() {
    let parts = [
        Statistics::completed(630.0),
        Statistics::rejected(),
        Statistics::completed(504.0),
        Statistics::rejected(),
    ];
    let total: Statistics = parts.into_iter().sum();
    assert_eq!(
        total,
        Statistics {
            completed_orders: 2,
            rejected_orders: 2,
            revenue: 1134.0,
        }
    );
    assert_eq!(core::iter::empty::<Statistics>().sum::<Statistics>(), Statistics::ZERO);
}

#[test]
fn accumulator_starts_at_zero() {
    assert_eq!(Accumulator::new().get(), Statistics::ZERO);
}

#[test]
fn accumulator_combines_concurrently() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 1_000;

    let acc = Accumulator::new();
    scope(|s| {
        for t in 0..THREADS {
            let acc = &acc;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    if (t + i) % 2 == 0 {
                        acc.combine(Statistics::completed(0.5));
                    } else {
                        acc.combine(Statistics::rejected());
                    }
                }
            });
        }
    });

    let stats = acc.get();
    assert_eq!(stats.total_orders(), THREADS * PER_THREAD);
    assert_eq!(stats.completed_orders, THREADS * PER_THREAD / 2);
    assert_eq!(stats.rejected_orders, THREADS * PER_THREAD / 2);
    assert_eq!(stats.revenue, 2_000.0);
}

#[cfg(feature = "serde")]
#[test]
fn statistics_serialize_with_report_field_names() {
    let stats = Statistics {
        completed_orders: 1,
        rejected_orders: 2,
        revenue: 630.0,
    };
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "CompletedOrders": 1,
            "RejectedOrders": 2,
            "Revenue": 630.0,
        })
    );
    let back: Statistics = serde_json::from_value(json).unwrap();
    assert_eq!(back, stats);
}
