//! Payment Gateway Adapter
//!
//! Bridges the domain-facing `PaymentGateway` trait onto the HTTP gateway
//! client. All wire naming stays in the platform crate; the domain only
//! sees `OrderRequest` and `GatewayOrderState`.

use platform::payment::{CreateOrderRequest, CustomerDetails, GatewayClient, GatewayOrder};

use crate::domain::repository::PaymentGateway;
use crate::domain::value_objects::{GatewayOrderState, OrderRequest};
use crate::error::CommerceResult;

/// HTTP-backed payment gateway
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: GatewayClient,
}

impl HttpPaymentGateway {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

impl PaymentGateway for HttpPaymentGateway {
    async fn open_order(&self, request: &OrderRequest) -> CommerceResult<GatewayOrderState> {
        let wire = CreateOrderRequest {
            order_id: request.order_id.clone(),
            order_amount: request.amount_minor,
            order_currency: request.currency.clone(),
            customer_details: CustomerDetails {
                customer_id: request.customer.customer_id.clone(),
                customer_name: request.customer.name.clone(),
                customer_email: request.customer.email.clone(),
                customer_phone: request.customer.phone.clone(),
            },
            order_note: request.note.clone(),
        };

        let order = self.client.create_order(&wire).await?;
        Ok(into_order_state(order))
    }

    async fn lookup_order(&self, order_id: &str) -> CommerceResult<GatewayOrderState> {
        let order = self.client.get_order(order_id).await?;
        Ok(into_order_state(order))
    }
}

fn into_order_state(order: GatewayOrder) -> GatewayOrderState {
    GatewayOrderState {
        order_id: order.order_id,
        status: order.order_status,
        amount_minor: order.order_amount,
        payment_session_id: order.payment_session_id,
    }
}
