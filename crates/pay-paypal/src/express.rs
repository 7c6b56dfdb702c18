//! # Express Checkout Requests
//!
//! Typed requests for the two express-checkout calls. Each one serializes to
//! [`RequestFields`] only when handed to the transport.
//!
//! The buyer flow is:
//! 1. `SetExpressCheckout` returns a `TOKEN`.
//! 2. The buyer approves the payment at [`crate::PayPalConfig::checkout_redirect_url`]
//!    and is sent back to the return URL with `token` and `PayerID`.
//! 3. `DoExpressCheckoutPayment` captures the payment.

use pay_core::{format_amount, format_quantity, Decimal, LineItem, RequestFields};

/// Payment action used for digital-goods checkouts
pub const PAYMENT_ACTION_SALE: &str = "Sale";

const ITEM_NAME: &str = "L_PAYMENTREQUEST_0_NAME";
const ITEM_AMOUNT: &str = "L_PAYMENTREQUEST_0_AMT";
const ITEM_QUANTITY: &str = "L_PAYMENTREQUEST_0_QTY";
const ITEM_CATEGORY: &str = "L_PAYMENTREQUEST_0_ITEMCATEGORY";

/// A request that can be sent to the NVP API
pub trait NvpRequest {
    /// Value of the `METHOD` field
    const METHOD: &'static str;

    /// Operation-specific fields, without `METHOD` or credentials
    fn fields(&self) -> RequestFields;

    /// All operation fields including `METHOD`
    fn to_fields(&self) -> RequestFields {
        let mut fields = RequestFields::new().with("METHOD", Self::METHOD);
        for (key, value) in self.fields().iter() {
            fields.set(key, value);
        }
        fields
    }
}

/// Start a digital-goods checkout
#[derive(Debug, Clone, PartialEq)]
pub struct SetExpressCheckout {
    pub amount: Decimal,
    /// ISO 4217 code, sent as given
    pub currency_code: String,
    pub return_url: String,
    pub cancel_url: String,
    pub items: Vec<LineItem>,
}

impl NvpRequest for SetExpressCheckout {
    const METHOD: &'static str = "SetExpressCheckout";

    fn fields(&self) -> RequestFields {
        let mut fields = RequestFields::new()
            .with("PAYMENTREQUEST_0_AMT", format_amount(self.amount))
            .with("PAYMENTREQUEST_0_PAYMENTACTION", PAYMENT_ACTION_SALE)
            .with("PAYMENTREQUEST_0_CURRENCYCODE", self.currency_code.as_str())
            .with("RETURNURL", self.return_url.as_str())
            .with("CANCELURL", self.cancel_url.as_str())
            .with("REQCONFIRMSHIPPING", "0")
            .with("NOSHIPPING", "1")
            .with("SOLUTIONTYPE", "Sole");

        // the provider joins the four families on the index suffix
        for (i, item) in self.items.iter().enumerate() {
            fields.set_indexed(ITEM_NAME, i, item.name.as_str());
            fields.set_indexed(ITEM_AMOUNT, i, format_amount(item.unit_amount));
            fields.set_indexed(ITEM_QUANTITY, i, format_quantity(item.quantity));
            fields.set_indexed(ITEM_CATEGORY, i, "Digital");
        }

        fields
    }
}

/// Capture a checkout the buyer has approved
#[derive(Debug, Clone, PartialEq)]
pub struct DoExpressCheckoutPayment {
    pub token: String,
    pub payer_id: String,
    /// Usually `Sale`; sent as given
    pub payment_action: String,
    pub currency_code: String,
    pub amount: Decimal,
}

impl NvpRequest for DoExpressCheckoutPayment {
    const METHOD: &'static str = "DoExpressCheckoutPayment";

    fn fields(&self) -> RequestFields {
        RequestFields::new()
            .with("TOKEN", self.token.as_str())
            .with("PAYERID", self.payer_id.as_str())
            .with("PAYMENTREQUEST_0_PAYMENTACTION", self.payment_action.as_str())
            .with("PAYMENTREQUEST_0_CURRENCYCODE", self.currency_code.as_str())
            .with("PAYMENTREQUEST_0_AMT", format_amount(self.amount))
    }
}

/// Fields for a digital-goods `SetExpressCheckout` call
pub fn build_set_express_checkout(
    amount: Decimal,
    currency_code: &str,
    return_url: &str,
    cancel_url: &str,
    items: &[LineItem],
) -> RequestFields {
    SetExpressCheckout {
        amount,
        currency_code: currency_code.to_string(),
        return_url: return_url.to_string(),
        cancel_url: cancel_url.to_string(),
        items: items.to_vec(),
    }
    .to_fields()
}

/// Fields for a `DoExpressCheckoutPayment` call
pub fn build_confirm_express_checkout(
    token: &str,
    payer_id: &str,
    payment_action: &str,
    currency_code: &str,
    final_amount: Decimal,
) -> RequestFields {
    DoExpressCheckoutPayment {
        token: token.to_string(),
        payer_id: payer_id.to_string(),
        payment_action: payment_action.to_string(),
        currency_code: currency_code.to_string(),
        amount: final_amount,
    }
    .to_fields()
}
