// Control endpoints
//
// State-changing requests: the absolute control target (power on in comfort
// mode, power off, or hold a temperature) and comfort feedback.

use tracing::debug;

use crate::auth::Session;
use crate::client::AmbiClient;
use crate::error::Error;
use crate::models::{CommandResponse, ControlQuantity};

impl AmbiClient {
    /// Set the device's control target.
    ///
    /// `PUT AbsoluteApplianceControlTarget` with form fields `device_id`,
    /// `quantity` and `value`. The response echoes the quantity now in effect.
    pub async fn set_control_target(
        &self,
        session: &Session,
        device_id: &str,
        quantity: ControlQuantity,
        value: f64,
    ) -> Result<CommandResponse, Error> {
        let url = self.endpoint("AbsoluteApplianceControlTarget")?;
        debug!(device_id, quantity = quantity.as_str(), value, "setting control target");

        self.put_form(
            url,
            session,
            &[
                ("device_id", device_id.to_owned()),
                ("quantity", quantity.as_str().to_owned()),
                ("value", format!("{value:.1}")),
            ],
        )
        .await
    }

    /// Submit comfort feedback on the `-3..=3` scale.
    ///
    /// `PUT UserFeedback` with form fields `device_id`, `feedback` and `user_id`.
    pub async fn submit_feedback(
        &self,
        session: &Session,
        device_id: &str,
        feedback: i8,
    ) -> Result<CommandResponse, Error> {
        let url = self.endpoint("UserFeedback")?;
        debug!(device_id, feedback, "submitting feedback");

        self.put_form(
            url,
            session,
            &[
                ("device_id", device_id.to_owned()),
                ("feedback", feedback.to_string()),
                ("user_id", session.user_id.clone()),
            ],
        )
        .await
    }
}
