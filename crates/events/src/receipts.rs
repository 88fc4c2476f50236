//! Plain-text rendering of order emails.

use std::fmt::Write;

use crave_core::types::Money;
use crave_db::models::order::{Order, OrderItemDetail};

use crate::delivery::email::OutgoingEmail;

pub const CUSTOMER_SUBJECT: &str = "Order Confirmation - Crave & Glaze";
pub const ADMIN_SUBJECT: &str = "🔔 New Order Alert!";

fn kes(amount: Money) -> String {
    format!("KES {amount:.2}")
}

fn full_name(order: &Order) -> String {
    format!("{} {}", order.first_name, order.last_name)
        .trim()
        .to_string()
}

fn write_items(out: &mut String, items: &[OrderItemDetail]) {
    for item in items {
        let _ = writeln!(
            out,
            "  {} x {} ({}) - {}",
            item.quantity,
            item.product_name,
            item.weight_label,
            kes(item.line_total())
        );
        if !item.icing_flavor.is_empty() {
            let _ = writeln!(out, "      Icing: {}", item.icing_flavor);
        }
        if !item.custom_message.is_empty() {
            let _ = writeln!(out, "      Message: \"{}\"", item.custom_message);
        }
    }
}

/// Receipt for the customer, or `None` when they left no email address.
pub fn customer_receipt(order: &Order, items: &[OrderItemDetail]) -> Option<OutgoingEmail> {
    if order.email.is_empty() {
        return None;
    }

    let mut body = String::new();
    let _ = writeln!(body, "Hi {},", order.first_name);
    let _ = writeln!(body);
    let _ = writeln!(body, "Thank you for ordering from Crave & Glaze!");
    let _ = writeln!(body);
    let _ = writeln!(body, "Order #{}", order.id);
    write_items(&mut body, items);
    let _ = writeln!(body);
    let _ = writeln!(body, "Total: {}", kes(order.total_amount));
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "An M-Pesa prompt will be sent to {}. Your order is confirmed once payment completes.",
        order.customer_phone
    );

    Some(OutgoingEmail {
        to: order.email.clone(),
        reply_to: None,
        subject: CUSTOMER_SUBJECT.to_string(),
        body,
    })
}

/// Alert for the shop owner.
pub fn admin_alert(order: &Order, items: &[OrderItemDetail], admin_email: &str) -> OutgoingEmail {
    let mut body = String::new();
    let _ = writeln!(body, "New order #{} ({})", order.id, order.status);
    let _ = writeln!(body);
    let _ = writeln!(body, "Customer: {}", full_name(order));
    let _ = writeln!(body, "M-Pesa phone: {}", order.customer_phone);
    if !order.whatsapp_number.is_empty() {
        let _ = writeln!(body, "WhatsApp: {}", order.whatsapp_number);
    }
    if !order.email.is_empty() {
        let _ = writeln!(body, "Email: {}", order.email);
    }
    let _ = writeln!(body);
    write_items(&mut body, items);
    let _ = writeln!(body);
    let _ = writeln!(body, "Total: {}", kes(order.total_amount));
    let _ = writeln!(
        body,
        "Placed: {}",
        order.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    OutgoingEmail {
        to: admin_email.to_string(),
        reply_to: Some(order.email.clone()).filter(|e| !e.is_empty()),
        subject: ADMIN_SUBJECT.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn order(email: &str) -> Order {
        Order {
            id: 17,
            first_name: "Achieng".to_string(),
            last_name: "Otieno".to_string(),
            email: email.to_string(),
            whatsapp_number: "0722111222".to_string(),
            customer_phone: "254712345678".to_string(),
            total_amount: Money::from(2500),
            status: "PENDING".to_string(),
            mpesa_receipt: None,
            checkout_request_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 2, 14, 8, 30, 0).unwrap(),
        }
    }

    fn items() -> Vec<OrderItemDetail> {
        vec![
            OrderItemDetail {
                id: 1,
                order_id: 17,
                product_variant_id: 3,
                product_name: "Red Velvet".to_string(),
                image_url: String::new(),
                weight_label: "1kg".to_string(),
                quantity: 2,
                icing_flavor: "Cream cheese".to_string(),
                custom_message: "Happy Valentine's".to_string(),
                price_at_purchase: Money::from(1000),
            },
            OrderItemDetail {
                id: 2,
                order_id: 17,
                product_variant_id: 8,
                product_name: "Cupcakes".to_string(),
                image_url: String::new(),
                weight_label: "6 pcs".to_string(),
                quantity: 1,
                icing_flavor: String::new(),
                custom_message: String::new(),
                price_at_purchase: Money::from(500),
            },
        ]
    }

    #[test]
    fn no_customer_receipt_without_email() {
        assert!(customer_receipt(&order(""), &items()).is_none());
    }

    #[test]
    fn customer_receipt_lists_lines_and_total() {
        let email = customer_receipt(&order("achieng@example.com"), &items()).unwrap();
        assert_eq!(email.to, "achieng@example.com");
        assert_eq!(email.subject, CUSTOMER_SUBJECT);
        assert!(email.body.contains("Hi Achieng,"));
        assert!(email.body.contains("2 x Red Velvet (1kg) - KES 2000.00"));
        assert!(email.body.contains("Message: \"Happy Valentine's\""));
        assert!(email.body.contains("Total: KES 2500.00"));
        assert!(!email.body.contains("Icing: \n"));
    }

    #[test]
    fn admin_alert_carries_contact_details() {
        let email = admin_alert(&order(""), &items(), "owner@example.com");
        assert_eq!(email.to, "owner@example.com");
        assert!(email.body.contains("New order #17 (PENDING)"));
        assert!(email.body.contains("Customer: Achieng Otieno"));
        assert!(email.body.contains("WhatsApp: 0722111222"));
        assert!(!email.body.contains("Email:"));
        assert!(email.body.contains("Placed: 2025-02-14 08:30 UTC"));
        assert_eq!(email.reply_to, None);
    }

    #[test]
    fn admin_alert_replies_go_to_the_customer() {
        let email = admin_alert(&order("achieng@example.com"), &items(), "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("achieng@example.com"));
    }
}
