use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderLine, PlacedOrder};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_meals, orders};

use super::models::{NewOrderMealRow, NewOrderRow, OrderMealRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => DomainError::NotFound,
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_placed(order: OrderRow, lines: Vec<OrderMealRow>) -> PlacedOrder {
    PlacedOrder {
        id: order.id,
        restaurant_id: order.restaurant_id,
        address: order.address,
        lat_long: order.lat_long,
        order_total: order.order_total,
        eta: order.eta,
        eta_human: order.eta_human,
        created_at: order.created_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLine {
                meal_id: l.meal_id,
                name: l.name,
                price: l.price,
            })
            .collect(),
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<PlacedOrder, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order header
            let order_id = Uuid::new_v4();
            let header: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    restaurant_id: order.restaurant_id,
                    address: &order.address,
                    lat_long: order.lat_long.to_string(),
                    order_total: &order.order_total,
                    eta: order.eta.seconds,
                    eta_human: &order.eta.human,
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert the priced lines in one statement
            let new_lines: Vec<NewOrderMealRow> = order
                .lines
                .iter()
                .enumerate()
                .map(|(position, l)| NewOrderMealRow {
                    id: Uuid::new_v4(),
                    order_id,
                    meal_id: l.meal_id,
                    name: &l.name,
                    price: &l.price,
                    position: position as i32,
                })
                .collect();
            let lines: Vec<OrderMealRow> = diesel::insert_into(order_meals::table)
                .values(&new_lines)
                .returning(OrderMealRow::as_returning())
                .get_results(conn)?;

            Ok(to_placed(header, lines))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<PlacedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderMealRow::belonging_to(&order)
            .select(OrderMealRow::as_select())
            .order(order_meals::position.asc())
            .load(&mut conn)?;

        Ok(Some(to_placed(order, lines)))
    }
}
