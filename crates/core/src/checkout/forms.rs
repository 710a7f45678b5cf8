//! Checkout forms

use crate::orders::PaymentMethod;

/// Country used when the customer does not pick one.
pub const DEFAULT_COUNTRY: &str = "India";

/// Delivery address step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForm {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// ZIP / PIN code
    pub zip: String,

    /// Country
    pub country: String,
}

impl Default for AddressForm {
    fn default() -> Self {
        AddressForm {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl AddressForm {
    /// Labels of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

/// Payment step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    /// Selected method
    pub method: PaymentMethod,

    /// Card number
    pub card_number: String,

    /// Name on card
    pub card_name: String,

    /// Expiry, `MM/YY`
    pub expiry: String,

    /// Card security code
    pub cvv: String,
}

impl PaymentForm {
    /// Labels of required fields that are blank. Only card payments have required fields.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.method != PaymentMethod::Card {
            return Vec::new();
        }

        [
            ("card number", &self.card_number),
            ("name on card", &self.card_name),
            ("expiry date", &self.expiry),
            ("CVV", &self.cvv),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_address() -> AddressForm {
        AddressForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip: "560001".to_string(),
            ..AddressForm::default()
        }
    }

    #[test]
    fn complete_address_has_no_missing_fields() {
        assert!(complete_address().missing_fields().is_empty());
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let form = AddressForm {
            city: "   ".to_string(),
            ..complete_address()
        };

        assert_eq!(form.missing_fields(), vec!["city"]);
    }

    #[test]
    fn empty_address_reports_every_field() {
        assert_eq!(AddressForm::default().missing_fields().len(), 8);
    }

    #[test]
    fn country_defaults_to_india() {
        assert_eq!(AddressForm::default().country, "India");
    }

    #[test]
    fn cash_payment_needs_nothing() {
        assert!(PaymentForm::default().missing_fields().is_empty());
    }

    #[test]
    fn card_payment_needs_card_details() {
        let form = PaymentForm {
            method: PaymentMethod::Card,
            card_number: "4111111111111111".to_string(),
            ..PaymentForm::default()
        };

        assert_eq!(
            form.missing_fields(),
            vec!["name on card", "expiry date", "CVV"]
        );
    }
}
