use crate::flow::FlowController;
use crate::services::notification_service::NotificationService;

#[derive(Clone)]
pub struct AppState {
    pub flow: FlowController,
    pub notifications: NotificationService,
}
