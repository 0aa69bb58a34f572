//! OTP Login Flow
//!
//! phone submitted -> OTP pending -> verified. The session store is written
//! only when verification succeeds.

use tracing::{error, info, warn};

use super::presenter::{Presenter, View};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{OtpDelivery, OtpSession, OtpVerification, PhoneNumber};
use crate::providers::api::{EmergencyApi, Fallback};
use crate::providers::session::SessionStore;
use crate::utils::constants::{
    MSG_INVALID_OTP, MSG_INVALID_PHONE, MSG_OTP_SEND_FAILED, MSG_SESSION_SAVE_FAILED,
    STORAGE_KEY_AUTH_TOKEN, STORAGE_KEY_USER_PHONE,
};

/// Result of a successful OTP request
#[derive(Debug, Clone, PartialEq)]
pub struct LoginChallenge {
    pub session: OtpSession,
    /// Only set when the backend echoes the OTP and demo exposure is enabled
    pub demo_otp: Option<String>,
}

pub struct AuthFlow<A, St, P> {
    api: A,
    store: St,
    presenter: P,
}

impl<A, St, P> AuthFlow<A, St, P>
where
    A: EmergencyApi,
    St: SessionStore,
    P: Presenter,
{
    pub fn new(api: A, store: St, presenter: P) -> Self {
        Self {
            api,
            store,
            presenter,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn parse_phone(&mut self, raw: &str) -> AppResult<PhoneNumber> {
        PhoneNumber::parse(raw).map_err(|e| {
            self.presenter.alert(MSG_INVALID_PHONE);
            e
        })
    }

    /// Validate the number and ask the backend to send an OTP
    pub async fn request_login(&mut self, raw_phone: &str) -> AppResult<LoginChallenge> {
        let phone = self.parse_phone(raw_phone)?;

        let delivery = self
            .api
            .send_otp(&phone)
            .await
            .unwrap_or_else(|e| OtpDelivery::fallback(&e));

        if !delivery.success {
            self.presenter.alert(MSG_OTP_SEND_FAILED);
            return Err(AppError::rejected(
                delivery
                    .error_message
                    .unwrap_or_else(|| "OTP could not be sent".to_string()),
            ));
        }

        self.presenter.show_otp_step(&phone)?;
        if let Some(otp) = &delivery.otp {
            warn!("Demo OTP shown to the user");
            self.presenter.alert(&format!("Demo OTP: {}", otp));
        }

        info!("📱 OTP pending for {}", phone.display_form());
        Ok(LoginChallenge {
            session: OtpSession::pending(phone),
            demo_otp: delivery.otp,
        })
    }

    /// Verify the OTP, persist the session and move to the dashboard
    pub async fn confirm_login(&mut self, raw_phone: &str, otp: &str) -> AppResult<OtpSession> {
        let phone = self.parse_phone(raw_phone)?;

        let verification = self
            .api
            .verify_otp(&phone, otp)
            .await
            .unwrap_or_else(|e| OtpVerification::fallback(&e));

        let verified = if verification.success {
            OtpSession::verified(phone.clone(), verification.token.unwrap_or_default())
        } else {
            Err(AppError::rejected(
                verification
                    .error_message
                    .unwrap_or_else(|| "OTP verification failed".to_string()),
            ))
        };

        let session = match verified {
            Ok(session) => session,
            Err(e) => {
                warn!(code = e.code_str(), "⚠️ Login failed for {}: {}", phone.display_form(), e.message);
                self.presenter.alert(MSG_INVALID_OTP);
                return Err(e);
            }
        };

        if let Err(e) = self.persist(&session) {
            error!(code = e.code_str(), "❌ Session not saved: {}", e.message);
            self.presenter.alert(MSG_SESSION_SAVE_FAILED);
            return Err(e);
        }

        info!("🔓 Logged in as {}", phone.display_form());
        self.presenter.navigate(View::Dashboard)?;
        Ok(session)
    }

    /// Write token and phone together. A half-written session is rolled back.
    fn persist(&self, session: &OtpSession) -> AppResult<()> {
        let token = session
            .auth_token()
            .ok_or_else(|| AppError::rejected("verified session carries no token"))?;
        self.store.set(STORAGE_KEY_AUTH_TOKEN, token)?;

        if let Err(e) = self.store.set(STORAGE_KEY_USER_PHONE, session.phone().as_str()) {
            if let Err(cleanup) = self.store.remove(STORAGE_KEY_AUTH_TOKEN) {
                warn!(
                    code = cleanup.code_str(),
                    "⚠️ Orphaned auth token left in store: {}",
                    cleanup.message
                );
            }
            return Err(e);
        }
        Ok(())
    }

    /// Session restored from the store, if both entries are present
    pub fn current_session(&self) -> AppResult<Option<OtpSession>> {
        let token = self.store.get(STORAGE_KEY_AUTH_TOKEN)?;
        let phone = self.store.get(STORAGE_KEY_USER_PHONE)?;

        match (token, phone) {
            (Some(token), Some(phone)) => {
                let phone = PhoneNumber::parse(&phone)?;
                Ok(Some(OtpSession::verified(phone, token)?))
            }
            _ => Ok(None),
        }
    }

    /// Phone of the stored session, for tagging an SOS.
    /// An unreadable or inconsistent store counts as logged out.
    pub fn session_user_id(&self) -> Option<String> {
        match self.current_session() {
            Ok(session) => session.map(|s| s.phone().as_str().to_string()),
            Err(e) => {
                warn!(code = e.code_str(), "⚠️ Stored session ignored: {}", e.message);
                None
            }
        }
    }

    /// Clear the stored session and return to the login view
    pub fn logout(&mut self) -> AppResult<()> {
        self.store.remove(STORAGE_KEY_AUTH_TOKEN)?;
        self.store.remove(STORAGE_KEY_USER_PHONE)?;
        info!("🔒 Logged out");
        self.presenter.navigate(View::Login)
    }
}
