use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{MenuItem, Restaurant};
use crate::domain::ports::CatalogRepository;
use crate::schema::{meals, restaurants};

use super::models::{MealRow, RestaurantRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_restaurant_with_menu(
        &self,
        name: &str,
    ) -> Result<Option<(Restaurant, Vec<MenuItem>)>, DomainError> {
        let mut conn = self.pool.get()?;

        // Plain `=`: the match on the commercial name is case-sensitive.
        let restaurant = restaurants::table
            .filter(restaurants::commercial_name.eq(name))
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(restaurant) = restaurant else {
            return Ok(None);
        };

        let menu = MealRow::belonging_to(&restaurant)
            .select(MealRow::as_select())
            .order(meals::created_at.asc())
            .then_order_by(meals::name.asc())
            .load(&mut conn)?;

        Ok(Some((
            Restaurant {
                id: restaurant.id,
                commercial_name: restaurant.commercial_name,
                location: restaurant.location,
            },
            menu.into_iter()
                .map(|m| MenuItem {
                    id: m.id,
                    name: m.name,
                    price: m.price,
                })
                .collect(),
        )))
    }
}
