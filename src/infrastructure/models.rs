use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{meals, order_meals, orders, restaurants};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantRow {
    pub id: Uuid,
    pub commercial_name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = meals)]
#[diesel(belongs_to(RestaurantRow, foreign_key = restaurant_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MealRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub address: String,
    pub lat_long: String,
    pub order_total: BigDecimal,
    pub eta: i32,
    pub eta_human: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub address: &'a str,
    pub lat_long: String,
    pub order_total: &'a BigDecimal,
    pub eta: i32,
    pub eta_human: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_meals)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderMealRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub meal_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub position: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_meals)]
pub struct NewOrderMealRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub meal_id: Uuid,
    pub name: &'a str,
    pub price: &'a BigDecimal,
    pub position: i32,
}
