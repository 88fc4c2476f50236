//! Checkout validation and order-line construction.
//!
//! Turns a client-held cart plus the customer form into the rows the order
//! repository inserts. Prices are taken from storage at this point and
//! frozen into each line as `price_at_purchase`.

use std::collections::HashMap;

use validator::ValidateEmail;

use crate::cart::CartLine;
use crate::error::CoreError;
use crate::phone::normalize_msisdn;
use crate::types::{DbId, Money};

/// Largest quantity accepted for a single cart line.
pub const MAX_LINE_QUANTITY: i32 = 100;

/// Customer contact details captured by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub whatsapp_number: String,
    /// M-Pesa number, normalized to international form.
    pub payment_phone: String,
}

impl CustomerDetails {
    /// Validate and normalize raw form input.
    ///
    /// First name and payment phone are required. Email is optional but must
    /// be well-formed when present.
    pub fn parse(
        first_name: &str,
        last_name: &str,
        email: &str,
        whatsapp_number: &str,
        payment_phone: &str,
    ) -> Result<Self, CoreError> {
        let first_name = first_name.trim();
        let payment_phone = normalize_msisdn(payment_phone);

        if first_name.is_empty() || payment_phone.is_empty() {
            return Err(CoreError::Validation(
                "Name and Phone are required".to_string(),
            ));
        }
        if !payment_phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::Validation(
                "Phone number must contain digits only".to_string(),
            ));
        }

        let email = email.trim();
        if !email.is_empty() && !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.trim().to_string(),
            email: email.to_string(),
            whatsapp_number: whatsapp_number.trim().to_string(),
            payment_phone,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A line ready for insertion into `order_items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub variant_id: DbId,
    pub quantity: i32,
    pub icing_flavor: String,
    pub custom_message: String,
    pub price_at_purchase: Money,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.price_at_purchase * Money::from(self.quantity)
    }
}

/// Reject quantities outside `1..=MAX_LINE_QUANTITY`.
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Build order lines from the cart using current variant prices.
///
/// `prices` maps variant id to its stored price. Any cart line whose variant
/// is absent from the map, or whose quantity is invalid, fails the whole
/// checkout.
pub fn build_order_lines(
    cart: &[CartLine],
    prices: &HashMap<DbId, Money>,
) -> Result<Vec<OrderLine>, CoreError> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    cart.iter()
        .map(|line| {
            validate_quantity(line.quantity)?;
            let price = prices.get(&line.variant_id).copied().ok_or_else(|| {
                CoreError::VariantUnavailable {
                    variant_id: line.variant_id,
                    name: line.product_name.clone(),
                }
            })?;
            Ok(OrderLine {
                variant_id: line.variant_id,
                quantity: line.quantity,
                icing_flavor: line.icing.clone(),
                custom_message: line.message.clone(),
                price_at_purchase: price,
            })
        })
        .collect()
}

/// Σ price_at_purchase × quantity.
pub fn order_total(lines: &[OrderLine]) -> Money {
    lines.iter().map(OrderLine::line_total).sum()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn cart_line(variant_id: DbId, price: i64, quantity: i32) -> CartLine {
        CartLine {
            variant_id,
            product_name: format!("Cake {variant_id}"),
            image_url: String::new(),
            price: Money::from(price),
            quantity,
            message: "Happy Birthday".to_string(),
            icing: "vanilla".to_string(),
        }
    }

    #[test]
    fn two_line_checkout_totals_2500() {
        let cart = vec![cart_line(1, 1000, 2), cart_line(2, 500, 1)];
        let prices = HashMap::from([(1, Money::from(1000)), (2, Money::from(500))]);

        let lines = build_order_lines(&cart, &prices).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].price_at_purchase, Money::from(1000));
        assert_eq!(lines[1].price_at_purchase, Money::from(500));
        assert_eq!(order_total(&lines), Money::from(2500));
    }

    #[test]
    fn stored_price_wins_over_cookie_price() {
        let cart = vec![cart_line(1, 1, 3)];
        let prices = HashMap::from([(1, Money::from(1500))]);

        let lines = build_order_lines(&cart, &prices).unwrap();
        assert_eq!(lines[0].price_at_purchase, Money::from(1500));
        assert_eq!(order_total(&lines), Money::from(4500));
    }

    #[test]
    fn unknown_variant_fails() {
        let cart = vec![cart_line(1, 1000, 1), cart_line(9, 200, 1)];
        let prices = HashMap::from([(1, Money::from(1000))]);

        let err = build_order_lines(&cart, &prices).unwrap_err();
        assert_matches!(&err, CoreError::VariantUnavailable { variant_id: 9, .. });
        assert!(err.to_string().contains("variant 9"));
    }

    #[test]
    fn empty_cart_fails() {
        assert_matches!(
            build_order_lines(&[], &HashMap::new()),
            Err(CoreError::EmptyCart)
        );
    }

    #[test]
    fn zero_quantity_fails() {
        let cart = vec![cart_line(1, 1000, 0)];
        let prices = HashMap::from([(1, Money::from(1000))]);
        assert_matches!(build_order_lines(&cart, &prices), Err(CoreError::Validation(_)));
    }

    #[test]
    fn customer_requires_name_and_phone() {
        assert_matches!(
            CustomerDetails::parse("", "Doe", "", "", "0712345678"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            CustomerDetails::parse("Jane", "Doe", "", "", "   "),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn customer_phone_is_normalized() {
        let details =
            CustomerDetails::parse(" Jane ", "Doe", "jane@example.com", "0700000000", "0712345678")
                .unwrap();
        assert_eq!(details.payment_phone, "254712345678");
        assert_eq!(details.first_name, "Jane");
        assert_eq!(details.full_name(), "Jane Doe");
    }

    #[test]
    fn customer_email_optional_but_checked() {
        assert!(CustomerDetails::parse("Jane", "", "", "", "0712345678").is_ok());
        assert_matches!(
            CustomerDetails::parse("Jane", "", "not-an-email", "", "0712345678"),
            Err(CoreError::Validation(_))
        );
    }
}
