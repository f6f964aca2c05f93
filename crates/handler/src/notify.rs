use pipeline::{ChatNotifier, NotificationMessage};
use tracing::{error, info, warn};

/// Posts `message`, logging and swallowing every failure.
///
/// A non-2xx answer and a transport failure are both logged; neither reaches
/// the caller, so the invocation result never depends on chat delivery.
pub async fn deliver<N>(notifier: &N, message: &NotificationMessage)
where
    N: ChatNotifier + ?Sized,
{
    match notifier.post(message).await {
        Ok(status) if status.is_success() => {
            info!(status = status.as_u16(), "Posted message to chat webhook");
        }
        Ok(status) => {
            warn!(
                status = status.as_u16(),
                "Chat webhook answered with a non-success status"
            );
        }
        Err(err) => {
            error!(error = %err, "Failed to post message to chat webhook");
        }
    }
}
