//! # Order Aggregate
//!
//! Pricing, totals, the status machine and the validated request types the
//! services consume.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineRequest ──► PricedLine::price(menu item, modifiers)                │
//! │  (validated)        │                                                   │
//! │                     ├── menu item unavailable? → MenuItemUnavailable    │
//! │                     ▼                                                   │
//! │              subtotal = (unit price + Σ deltas) × quantity              │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  order_total(all subtotals of the order) ──► Order.total_cents          │
//! │                                                                         │
//! │  The total is always recomputed from every line, never accumulated.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Machine
//! ```text
//! from        │ generic update may move to
//! ────────────┼───────────────────────────
//! pending     │ confirmed, preparing
//! confirmed   │ preparing, ready
//! preparing   │ ready
//! ready       │ -
//! completed   │ terminal (entered by payment only)
//! cancelled   │ terminal (entered by cancel only)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{MenuItem, Modifier, Order, OrderStatus, OrderType};
use crate::validation::{
    validate_customer_name, validate_customer_phone, validate_notes, validate_quantity, validate_required,
};
use crate::MAX_ORDER_LINES;

// =============================================================================
// Totals
// =============================================================================

/// Computes `(unit_price + Σ modifier_deltas) × quantity`.
///
/// A negative per-unit price (a large discount modifier) is carried through
/// unclamped.
///
/// ## Example
/// ```rust
/// use saffron_core::money::Money;
/// use saffron_core::order::line_subtotal;
///
/// let sub = line_subtotal(Money::from_cents(12000), &[Money::from_cents(1000)], 2);
/// assert_eq!(sub.to_string(), "260.00");
/// ```
pub fn line_subtotal(unit_price: Money, modifier_deltas: &[Money], quantity: i64) -> Money {
    let per_unit = unit_price + modifier_deltas.iter().copied().sum::<Money>();
    per_unit.multiply_quantity(quantity)
}

/// Sums line subtotals into an order total.
pub fn order_total<I>(subtotals: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    subtotals.into_iter().sum()
}

// =============================================================================
// Status Machine
// =============================================================================

impl OrderStatus {
    /// Completed and cancelled orders accept no further changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Active orders are the ones the floor and kitchen still care about.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Statuses reachable through a generic order update.
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Preparing],
            OrderStatus::Confirmed => &[OrderStatus::Preparing, OrderStatus::Ready],
            OrderStatus::Preparing => &[OrderStatus::Ready],
            OrderStatus::Ready | OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    /// Setting the current status again is a no-op and is allowed.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        *self == to || self.allowed_next().contains(&to)
    }

    /// Fails when the order is terminal.
    pub fn ensure_modifiable(&self, order_id: &str) -> CoreResult<()> {
        if self.is_terminal() {
            return Err(CoreError::OrderNotModifiable {
                order_id: order_id.to_string(),
                status: *self,
            });
        }
        Ok(())
    }

    /// Checks a status change requested through a generic update.
    pub fn transition_for_update(&self, to: OrderStatus) -> CoreResult<()> {
        if !self.can_transition_to(to) {
            return Err(CoreError::InvalidStatusTransition { from: *self, to });
        }
        Ok(())
    }
}

// =============================================================================
// Order Kind
// =============================================================================

/// The authenticated staff member acting on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: Option<String>,
}

/// What kind of order is being placed, with the fields that kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKind {
    DineIn {
        table_id: String,
        customer: Option<CustomerContact>,
    },
    Takeaway {
        customer: CustomerContact,
    },
}

impl OrderKind {
    /// Builds the kind from the flat request fields.
    ///
    /// A takeaway request that carries a table id ignores it. A dine-in phone
    /// number without a name is dropped.
    pub fn resolve(
        order_type: OrderType,
        table_id: Option<&str>,
        customer_name: Option<&str>,
        customer_phone: Option<&str>,
    ) -> CoreResult<Self> {
        let phone = validate_customer_phone(customer_phone)?;
        let name = customer_name.map(str::trim).filter(|n| !n.is_empty());

        match order_type {
            OrderType::DineIn => {
                let table_id = validate_required("table_id", table_id.unwrap_or_default())?;
                let customer = match name {
                    Some(name) => Some(CustomerContact {
                        name: validate_customer_name(name)?,
                        phone,
                    }),
                    None => None,
                };
                Ok(OrderKind::DineIn { table_id, customer })
            }
            OrderType::Takeaway => {
                let name = validate_customer_name(name.unwrap_or_default())?;
                Ok(OrderKind::Takeaway {
                    customer: CustomerContact { name, phone },
                })
            }
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            OrderKind::DineIn { .. } => OrderType::DineIn,
            OrderKind::Takeaway { .. } => OrderType::Takeaway,
        }
    }

    pub fn table_id(&self) -> Option<&str> {
        match self {
            OrderKind::DineIn { table_id, .. } => Some(table_id),
            OrderKind::Takeaway { .. } => None,
        }
    }

    pub fn customer(&self) -> Option<&CustomerContact> {
        match self {
            OrderKind::DineIn { customer, .. } => customer.as_ref(),
            OrderKind::Takeaway { customer } => Some(customer),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One validated line of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub menu_item_id: String,
    pub quantity: i64,
    pub notes: Option<String>,
    /// Selected modifiers, duplicates removed, first occurrence kept.
    pub modifier_ids: Vec<String>,
}

impl LineRequest {
    pub fn new(
        menu_item_id: &str,
        quantity: i64,
        notes: Option<&str>,
        modifier_ids: impl IntoIterator<Item = String>,
    ) -> CoreResult<Self> {
        let menu_item_id = validate_required("menu_item_id", menu_item_id)?;
        validate_quantity(quantity)?;
        let notes = validate_notes(notes)?;

        let mut unique: Vec<String> = Vec::new();
        for id in modifier_ids {
            let id = validate_required("modifier_ids", &id)?;
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Ok(Self {
            menu_item_id,
            quantity,
            notes,
            modifier_ids: unique,
        })
    }
}

fn check_line_count(lines: usize) -> Result<(), ValidationError> {
    if lines > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order_items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }
    Ok(())
}

/// A validated order creation request.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub kind: OrderKind,
    pub staff: StaffRef,
    pub lines: Vec<LineRequest>,
}

impl NewOrder {
    pub fn new(kind: OrderKind, staff: StaffRef, lines: Vec<LineRequest>) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(ValidationError::Required {
                field: "order_items".to_string(),
            }
            .into());
        }
        check_line_count(lines.len())?;

        Ok(Self { kind, staff, lines })
    }
}

/// A validated order update request: a status change, appended lines, or both.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub lines: Vec<LineRequest>,
}

impl OrderUpdate {
    pub fn new(status: Option<OrderStatus>, lines: Vec<LineRequest>) -> CoreResult<Self> {
        if status.is_none() && lines.is_empty() {
            return Err(ValidationError::Required {
                field: "status or order_items".to_string(),
            }
            .into());
        }
        check_line_count(lines.len())?;

        Ok(Self { status, lines })
    }
}

// =============================================================================
// Priced Line
// =============================================================================

/// A modifier as frozen onto an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedModifier {
    pub modifier_id: String,
    pub name: String,
    pub price_change: Money,
}

/// A line with prices resolved against the catalog, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: Money,
    pub modifiers: Vec<PricedModifier>,
    pub modifiers_total: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub notes: Option<String>,
}

impl PricedLine {
    /// Prices a line. `modifiers` are the rows already looked up for
    /// `line.modifier_ids`; they are not checked against the menu item's
    /// offerable set.
    pub fn price(menu_item: &MenuItem, modifiers: &[Modifier], line: &LineRequest) -> CoreResult<Self> {
        if !menu_item.is_available {
            return Err(CoreError::MenuItemUnavailable {
                name: menu_item.name.clone(),
            });
        }

        let deltas: Vec<Money> = modifiers.iter().map(Modifier::price_change).collect();
        let unit_price = menu_item.price();

        Ok(Self {
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            unit_price,
            modifiers: modifiers
                .iter()
                .map(|m| PricedModifier {
                    modifier_id: m.id.clone(),
                    name: m.name.clone(),
                    price_change: m.price_change(),
                })
                .collect(),
            modifiers_total: deltas.iter().copied().sum(),
            quantity: line.quantity,
            subtotal: line_subtotal(unit_price, &deltas, line.quantity),
            notes: line.notes.clone(),
        })
    }
}

// =============================================================================
// Payment Check
// =============================================================================

/// Decides whether `amount` may settle `order`.
///
/// Checks run in this order: already paid, cancelled, amount mismatch.
pub fn check_payment(order: &Order, already_paid: bool, amount: Money) -> CoreResult<()> {
    if already_paid {
        return Err(CoreError::OrderAlreadyPaid {
            order_id: order.id.clone(),
        });
    }

    if order.status == OrderStatus::Cancelled {
        return Err(CoreError::OrderCancelled {
            order_id: order.id.clone(),
        });
    }

    if amount != order.total() {
        return Err(CoreError::PaymentAmountMismatch {
            expected: order.total(),
            received: amount,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn menu_item(name: &str, price_cents: i64, is_available: bool) -> MenuItem {
        MenuItem {
            id: format!("mi-{name}"),
            category_id: "cat-main".to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            is_available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn modifier(name: &str, price_change_cents: i64) -> Modifier {
        Modifier {
            id: format!("mod-{name}"),
            name: name.to_string(),
            price_change_cents,
            created_at: Utc::now(),
        }
    }

    fn order(status: OrderStatus, total_cents: i64) -> Order {
        Order {
            id: "o-1".to_string(),
            table_id: Some("t-5".to_string()),
            staff_id: "s-1".to_string(),
            staff_name: "Malee".to_string(),
            order_type: OrderType::DineIn,
            customer_name: None,
            customer_phone: None,
            status,
            total_cents,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(menu_item_id: &str, quantity: i64) -> LineRequest {
        LineRequest::new(menu_item_id, quantity, None, Vec::new()).unwrap()
    }

    #[test]
    fn test_dine_in_scenario_totals_430() {
        let pad_thai = PricedLine::price(
            &menu_item("Pad Thai", 12000, true),
            &[modifier("Extra Spicy", 1000)],
            &line("mi-Pad Thai", 2),
        )
        .unwrap();
        let curry = PricedLine::price(
            &menu_item("Green Curry", 15000, true),
            &[modifier("Extra Portion", 2000)],
            &line("mi-Green Curry", 1),
        )
        .unwrap();

        assert_eq!(pad_thai.subtotal, Money::from_cents(26000));
        assert_eq!(pad_thai.modifiers_total, Money::from_cents(1000));
        assert_eq!(order_total([pad_thai.subtotal, curry.subtotal]).to_string(), "430.00");
    }

    #[test]
    fn test_takeaway_scenario_totals_150() {
        let soup = PricedLine::price(&menu_item("Tom Yum", 15000, true), &[], &line("mi-Tom Yum", 1)).unwrap();
        assert_eq!(order_total([soup.subtotal]).to_string(), "150.00");
    }

    #[test]
    fn test_negative_per_unit_price_not_clamped() {
        let sub = line_subtotal(Money::from_cents(500), &[Money::from_cents(-800)], 2);
        assert_eq!(sub, Money::from_cents(-600));
    }

    #[test]
    fn test_unavailable_item_names_item() {
        let err = PricedLine::price(&menu_item("Mango Sticky Rice", 9000, false), &[], &line("mi-x", 1))
            .unwrap_err();
        assert!(err.to_string().contains("Mango Sticky Rice"));
    }

    #[test]
    fn test_status_machine_allow_list() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Preparing));
        assert!(Confirmed.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Ready));

        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Preparing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Ready.can_transition_to(Cancelled));

        assert!(matches!(
            Preparing.transition_for_update(Pending),
            Err(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_terminal_orders_not_modifiable() {
        assert!(OrderStatus::Completed.ensure_modifiable("o-1").is_err());
        assert!(OrderStatus::Cancelled.ensure_modifiable("o-1").is_err());
        assert!(OrderStatus::Ready.ensure_modifiable("o-1").is_ok());
    }

    #[test]
    fn test_resolve_dine_in_requires_table() {
        let err = OrderKind::resolve(OrderType::DineIn, None, None, None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));

        let kind = OrderKind::resolve(OrderType::DineIn, Some("t-5"), None, None).unwrap();
        assert_eq!(kind.table_id(), Some("t-5"));
        assert!(kind.customer().is_none());
    }

    #[test]
    fn test_resolve_takeaway_requires_name_and_ignores_table() {
        assert!(OrderKind::resolve(OrderType::Takeaway, None, Some("  "), None).is_err());

        let kind = OrderKind::resolve(OrderType::Takeaway, Some("t-5"), Some("Somchai"), Some("0812345678")).unwrap();
        assert_eq!(kind.order_type(), OrderType::Takeaway);
        assert_eq!(kind.table_id(), None);
        assert_eq!(kind.customer().map(|c| c.name.as_str()), Some("Somchai"));
    }

    #[test]
    fn test_line_request_dedupes_modifiers() {
        let line = LineRequest::new(
            "mi-1",
            1,
            Some("  "),
            vec!["m-1".to_string(), "m-2".to_string(), "m-1".to_string()],
        )
        .unwrap();
        assert_eq!(line.modifier_ids, vec!["m-1", "m-2"]);
        assert_eq!(line.notes, None);
    }

    #[test]
    fn test_new_order_needs_lines() {
        let staff = StaffRef {
            id: "s-1".to_string(),
            name: "Malee".to_string(),
        };
        let kind = OrderKind::resolve(OrderType::DineIn, Some("t-1"), None, None).unwrap();

        assert!(NewOrder::new(kind.clone(), staff.clone(), Vec::new()).is_err());

        let too_many = (0..=MAX_ORDER_LINES).map(|_| line("mi-1", 1)).collect();
        assert!(NewOrder::new(kind, staff, too_many).is_err());
    }

    #[test]
    fn test_update_needs_status_or_lines() {
        assert!(OrderUpdate::new(None, Vec::new()).is_err());
        assert!(OrderUpdate::new(Some(OrderStatus::Confirmed), Vec::new()).is_ok());
        assert!(OrderUpdate::new(None, vec![line("mi-1", 1)]).is_ok());
    }

    #[test]
    fn test_check_payment_order_of_checks() {
        let paid = order(OrderStatus::Cancelled, 38000);
        assert!(matches!(
            check_payment(&paid, true, Money::from_cents(38000)),
            Err(CoreError::OrderAlreadyPaid { .. })
        ));
        assert!(matches!(
            check_payment(&paid, false, Money::from_cents(38000)),
            Err(CoreError::OrderCancelled { .. })
        ));

        let open = order(OrderStatus::Ready, 38000);
        assert!(check_payment(&open, false, Money::from_cents(38000)).is_ok());
        for received in [30000, 50000] {
            match check_payment(&open, false, Money::from_cents(received)) {
                Err(CoreError::PaymentAmountMismatch { expected, .. }) => {
                    assert_eq!(expected.to_string(), "380.00");
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_total_cannot_be_settled() {
        // A 10.00 item with a -15.00 modifier prices below zero
        let priced = PricedLine::price(
            &menu_item("Side Salad", 1000, true),
            &[modifier("Swap For Voucher", -1500)],
            &LineRequest::new("mi-Side Salad", 1, None, vec!["mod-Swap For Voucher".to_string()]).unwrap(),
        )
        .unwrap();
        assert_eq!(priced.subtotal.to_string(), "-5.00");

        let open = order(OrderStatus::Pending, priced.subtotal.cents());
        assert!(check_payment(&open, false, priced.subtotal).is_ok());
        assert!(matches!(
            crate::validation::validate_payment_amount(priced.subtotal),
            Err(ValidationError::Negative { .. })
        ));
    }
}
