// src/cart/hotel_structs.rs

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

fn one_night() -> u32 {
    1
}

/// A hotel room booking. `price` is per night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBooking {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "one_night", alias = "quantity")]
    pub nights: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Single-slot cart: holding a booking replaces whatever was there.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelCart {
    booking: Option<HotelBooking>,
}

impl HotelCart {
    pub fn booking(&self) -> Option<&HotelBooking> {
        self.booking.as_ref()
    }

    pub fn add_hotel(&mut self, mut booking: HotelBooking) {
        booking.nights = booking.nights.max(1);
        self.booking = Some(booking);
    }

    pub fn clear(&mut self) {
        self.booking = None;
    }

    pub fn total(&self) -> BigDecimal {
        self.booking
            .as_ref()
            .map(|b| &b.price * BigDecimal::from(b.nights))
            .unwrap_or_else(BigDecimal::zero)
    }
}
