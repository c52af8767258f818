use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::{
        addressdb::AddressExt,
        bookingdb::BookingExt,
        cartdb::CartExt,
        catalogdb::CatalogExt,
        paymentdb::{BookingSeed, PaymentExt},
        userdb::UserExt,
    },
    dtos::{
        checkoutdtos::{
            CheckoutData, CheckoutDto, CustomerSummary, PaymentIntentData, SupportContact,
            VerifyPaymentDto,
        },
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::paymentmodel::PaymentStatus,
    service::access::{require, Action},
    AppState,
};

pub fn checkout_handler() -> Router {
    Router::new()
        .route("/", post(checkout))
        .route("/payments/verify", post(verify_payment))
}

/// Turns the cart into bookings. The gateway order is created before any
/// row is written, so a gateway failure leaves cart and anchor untouched;
/// the write set itself commits or rolls back as one transaction.
pub async fn checkout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CheckoutDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    require(
        &user.user,
        &Action::Checkout {
            customer_id: user.user.id,
        },
    )?;

    let anchor = app_state
        .db_client
        .get_booking(body.booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    if !anchor.is_anchor() || anchor.user_id != user.user.id {
        return Err(HttpError::not_found("Booking not found"));
    }

    let now = Utc::now();
    if !anchor.start_otp_window_open(now) {
        return Err(HttpError::bad_request(ErrorMessage::OtpExpired.to_string()));
    }
    if !anchor.start_otp_matches(&body.otp) {
        return Err(HttpError::bad_request(ErrorMessage::OtpInvalid.to_string()));
    }

    let cart = app_state
        .db_client
        .get_cart(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::CartEmpty.to_string()))?;

    let items = app_state
        .db_client
        .get_cart_items(cart.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if items.is_empty() {
        return Err(HttpError::bad_request(ErrorMessage::CartEmpty.to_string()));
    }

    let address = app_state
        .db_client
        .get_default_address(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::NoDefaultAddress.to_string()))?;

    let mut seeds = Vec::with_capacity(items.len());
    let mut services = Vec::with_capacity(items.len());
    for item in &items {
        let service = app_state
            .db_client
            .get_service(item.service_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("Service not found"))?;

        let technician = app_state.matcher.select_technician(&service, &address).await;

        seeds.push(BookingSeed {
            service_id: item.service_id,
            technician_required: item.technician_count,
            technician,
        });
        services.push(service);
    }

    let amount: f64 = items.iter().map(|item| item.total).sum();
    let receipt = format!("rcpt_{}", cart.id.simple());

    let order = app_state
        .payment_gateway
        .create_order(amount, "INR", &receipt)
        .await
        .map_err(HttpError::from)?;

    let (payment, bookings) = app_state
        .db_client
        .record_checkout(
            user.user.id,
            &anchor,
            cart.id,
            &seeds,
            &order.order_id,
            amount,
            &order.currency,
            body.scheduled_datetime,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    for (booking, service) in bookings.iter().zip(services.iter()) {
        let technician = match booking.assigned_technician {
            Some(technician_id) => app_state
                .db_client
                .get_user(Some(technician_id), None, None)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        if let Err(e) = app_state
            .notification_service
            .booking_confirmed(&user.user, technician.as_ref(), booking, &service.name)
            .await
        {
            tracing::warn!("failed to notify booking {}: {}", booking.id, e);
        }
    }

    if let Err(e) = app_state
        .db_client
        .record_system_log(
            "booking",
            Some(user.user.id),
            &format!(
                "Checkout created {} bookings under order {}",
                bookings.len(),
                payment.order_id
            ),
        )
        .await
    {
        tracing::warn!("failed to record checkout for order {}: {}", payment.order_id, e);
    }

    let data = CheckoutData {
        payment: PaymentIntentData {
            order_id: payment.order_id.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            key_id: app_state.payment_gateway.public_key().to_string(),
        },
        bookings,
        customer: CustomerSummary {
            id: user.user.id.to_string(),
            username: user.user.username.clone(),
            email: user.user.email.clone(),
            country_code: user.user.country_code.clone(),
            mobile: user.user.mobile.clone(),
        },
        address,
        support: SupportContact {
            phone: app_state.env.support_phone.clone(),
            email: app_state.env.support_email.clone(),
        },
    };

    Ok(ApiResponse::created(
        "Checkout created. Complete the payment to confirm your bookings.",
        Some(data),
    ))
}

/// Confirms a captured payment. The signature is checked before anything is
/// looked up, and a payment already settled is returned as is.
pub async fn verify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    if !app_state
        .payment_gateway
        .verify_signature(&body.order_id, &body.payment_id, &body.signature)
    {
        return Err(HttpError::bad_request(
            ErrorMessage::InvalidPaymentSignature.to_string(),
        ));
    }

    let payment = app_state
        .db_client
        .get_payment_by_order_id(&body.order_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Payment not found"))?;

    require(&user.user, &Action::VerifyPayment(&payment))?;

    if payment.status == PaymentStatus::Success {
        return Ok(ApiResponse::ok("Payment already verified", Some(payment)));
    }

    let details = app_state
        .payment_gateway
        .fetch_payment(&body.payment_id)
        .await
        .map_err(HttpError::from)?;

    // The gateway's record of the method wins over what the client sent.
    let method = details.method.or(body.method);

    let updated = app_state
        .db_client
        .mark_payment_success(
            &body.order_id,
            &body.payment_id,
            method.as_deref(),
            details.receipt.as_deref(),
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => HttpError::not_found("Payment not found"),
            e => HttpError::server_error(e.to_string()),
        })?;

    if let Err(e) = app_state
        .db_client
        .record_system_log(
            "payment",
            Some(user.user.id),
            &format!("Payment {} verified for order {}", body.payment_id, body.order_id),
        )
        .await
    {
        tracing::warn!("failed to record payment for order {}: {}", body.order_id, e);
    }

    Ok(ApiResponse::ok("Payment verified successfully", Some(updated)))
}
