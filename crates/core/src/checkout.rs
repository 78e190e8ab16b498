//! Checkout input validation.
//!
//! Validation is pure; persisting the order (stock checks, price freezing,
//! customer find-or-create) happens inside the storefront's order repository
//! transaction.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::types::{Email, EmailError, ProductId};

/// Reasons a checkout submission is rejected before touching the database.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CheckoutError {
    /// Nothing purchasable is in the cart.
    #[error("cart is empty")]
    EmptyCart,
    /// One or more required contact fields were blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// The email field is present but not an address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Raw checkout form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub delivery_address: String,
}

/// Contact details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub email: Email,
    /// `None` when the address was left blank.
    pub delivery_address: Option<String>,
}

impl CheckoutForm {
    /// Validate the form.
    ///
    /// Name, phone and email are required after trimming. The email is
    /// lowercased. A blank delivery address is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing every blank required
    /// field, or [`CheckoutError::InvalidEmail`] if the email does not parse.
    pub fn validate(&self) -> Result<CustomerDetails, CheckoutError> {
        let name = self.customer_name.trim();
        let phone = self.customer_phone.trim();
        let email = self.customer_email.trim();

        let missing: Vec<&'static str> = [
            ("name", name),
            ("phone", phone),
            ("email", email),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        let address = self.delivery_address.trim();

        Ok(CustomerDetails {
            name: name.to_owned(),
            phone: phone.to_owned(),
            email: Email::parse(email)?,
            delivery_address: (!address.is_empty()).then(|| address.to_owned()),
        })
    }
}

/// What the order repository needs per line. The unit price is read (and
/// frozen) inside the order transaction, not taken from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineDraft {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Turn materialized cart lines into order line drafts.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there are no lines.
pub fn draft_lines<P: crate::cart::CatalogItem>(
    lines: &[CartLine<P>],
) -> Result<Vec<OrderLineDraft>, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    Ok(lines
        .iter()
        .map(|line| OrderLineDraft {
            product_id: line.product.id(),
            qty: line.qty,
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::{Cart, CatalogItem};
    use crate::types::Price;

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: " Ivan Petrov ".to_owned(),
            customer_phone: "+7 900 000-00-00".to_owned(),
            customer_email: "Ivan@Example.com".to_owned(),
            delivery_address: "   ".to_owned(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let details = form().validate().unwrap();
        assert_eq!(details.name, "Ivan Petrov");
        assert_eq!(details.email.as_str(), "ivan@example.com");
        assert_eq!(details.delivery_address, None);
    }

    #[test]
    fn test_validate_keeps_address() {
        let mut form = form();
        form.delivery_address = " Moscow, Tverskaya 1 ".to_owned();
        let details = form.validate().unwrap();
        assert_eq!(details.delivery_address.as_deref(), Some("Moscow, Tverskaya 1"));
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let form = CheckoutForm {
            customer_name: "  ".to_owned(),
            customer_email: "a@b.c".to_owned(),
            ..CheckoutForm::default()
        };
        match form.validate() {
            Err(CheckoutError::MissingFields(fields)) => assert_eq!(fields, vec!["name", "phone"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut form = form();
        form.customer_email = "not-an-email".to_owned();
        assert!(matches!(form.validate(), Err(CheckoutError::InvalidEmail(_))));
    }

    #[derive(Debug, Clone)]
    struct Item(i32);

    impl CatalogItem for Item {
        fn id(&self) -> ProductId {
            ProductId::new(self.0)
        }

        fn price(&self) -> Price {
            Price::from_cents(100)
        }

        fn is_active(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_draft_lines() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(3), 2);
        let lines = cart.materialize(&[Item(3)]);

        let drafts = draft_lines(&lines).unwrap();
        assert_eq!(
            drafts,
            vec![OrderLineDraft {
                product_id: ProductId::new(3),
                qty: 2
            }]
        );
    }

    #[test]
    fn test_draft_lines_empty() {
        let lines = Cart::new().materialize::<Item>(&[]);
        assert!(matches!(draft_lines(&lines), Err(CheckoutError::EmptyCart)));
    }
}
