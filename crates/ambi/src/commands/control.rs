//! One-shot control commands.

use ambi_core::{Command as CoreCommand, CommandResult, FeedbackValue};

use crate::cli::{GlobalOpts, PowerState};
use crate::error::CliError;
use crate::output;

pub async fn switch(device: &str, state: PowerState, global: &GlobalOpts) -> Result<(), CliError> {
    let result = execute(
        CoreCommand::SetSwitch {
            device: device.to_owned(),
            on: state.is_on(),
        },
        global,
    )
    .await?;

    let verb = if state.is_on() { "on" } else { "off" };
    report(&format!("Switched {device} {verb}"), &result, global);
    Ok(())
}

pub async fn temperature(device: &str, value: f64, global: &GlobalOpts) -> Result<(), CliError> {
    if !value.is_finite() {
        return Err(CliError::Validation {
            field: "temperature".into(),
            reason: format!("'{value}' is not a number"),
        });
    }

    let result = execute(
        CoreCommand::SetTemperature {
            device: device.to_owned(),
            temperature: value,
        },
        global,
    )
    .await?;

    report(&format!("Holding {device} at {value:.1} °C"), &result, global);
    Ok(())
}

pub async fn feedback(device: &str, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let value = FeedbackValue::from_name(name);
    if value.as_ref() != name {
        tracing::warn!(name, "unrecognised feedback; sending \"{}\"", value.label());
    }

    let result = execute(
        CoreCommand::SubmitFeedback {
            device: device.to_owned(),
            feedback: value,
        },
        global,
    )
    .await?;

    report(
        &format!("Sent \"{}\" for {device}", value.label()),
        &result,
        global,
    );
    Ok(())
}

async fn execute(cmd: CoreCommand, global: &GlobalOpts) -> Result<CommandResult, CliError> {
    let platform = super::connect(global).await?;
    tracing::debug!(command = ?cmd, "executing");
    Ok(platform.commands().execute(cmd).await?)
}

fn report(message: &str, result: &CommandResult, global: &GlobalOpts) {
    let message = match result.mode {
        Some(mode) => format!("{message} (mode: {mode})"),
        None => message.to_owned(),
    };
    output::print_success(&message, global.quiet, &global.color);
}
