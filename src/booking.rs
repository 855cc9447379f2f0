use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Result, ScoutError};
use crate::models::Property;

/// Price breakdown for a stay
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Quote {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: u32,
    pub nightly_rate: u32,
    pub subtotal: u64,
    pub cleaning_fee: u32,
    pub service_fee: u32,
    pub total: u64,
    pub currency: String,
}

pub fn quote(
    property: &Property,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
) -> Result<Quote> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(ScoutError::InvalidStay);
    }
    let nights = u32::try_from(nights).map_err(|_| ScoutError::InvalidStay)?;

    if guests == 0 {
        return Err(ScoutError::NoGuests);
    }
    if guests > property.capacity.guests {
        return Err(ScoutError::TooManyGuests {
            requested: guests,
            capacity: property.capacity.guests,
        });
    }

    let pricing = &property.pricing;
    let subtotal = u64::from(pricing.nightly_rate) * u64::from(nights);
    let total = subtotal + u64::from(pricing.cleaning_fee) + u64::from(pricing.service_fee);

    Ok(Quote {
        property_id: property.id.clone(),
        check_in,
        check_out,
        guests,
        nights,
        nightly_rate: pricing.nightly_rate,
        subtotal,
        cleaning_fee: pricing.cleaning_fee,
        service_fee: pricing.service_fee,
        total,
        currency: pricing.currency.clone(),
    })
}
