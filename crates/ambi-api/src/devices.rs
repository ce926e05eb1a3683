// Device listing endpoint
//
// A single authenticated GET returns every device on the account together
// with its location, latest sensor readings, appliance state and control
// target.

use tracing::debug;

use crate::auth::Session;
use crate::client::AmbiClient;
use crate::error::Error;
use crate::models::{RemoteDevice, UserResponse};

impl AmbiClient {
    /// List every device on the account, online or not.
    ///
    /// `GET User?expand=appliance,device,location&user_id={user_id}`
    pub async fn list_devices(&self, session: &Session) -> Result<Vec<RemoteDevice>, Error> {
        let mut url = self.endpoint("User")?;
        url.query_pairs_mut()
            .append_pair("expand", "appliance,device,location")
            .append_pair("user_id", &session.user_id);

        debug!("listing devices");
        let body: UserResponse = self.get(url, session).await?;
        Ok(body.devices)
    }
}
