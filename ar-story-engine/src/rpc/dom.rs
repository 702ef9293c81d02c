use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// Host page DOM updates, sent as notifications for the page to apply.
pub struct Dom<'a> {
    rpc_interface: &'a mut WebRpcInterface,
}

impl<'a> Dom<'a> {
    pub fn new(rpc_interface: &'a mut WebRpcInterface) -> Self {
        Self { rpc_interface }
    }

    pub fn show(&mut self, id: &str) -> &mut Self {
        self.set_display(id, "block")
    }

    pub fn hide(&mut self, id: &str) -> &mut Self {
        self.set_display(id, "none")
    }

    pub fn set_display(&mut self, id: &str, display: &str) -> &mut Self {
        self.rpc_interface.send_notification(
            "dom_display",
            serde_json::json!({ "id": id, "display": display }),
        );
        self
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> &mut Self {
        self.rpc_interface
            .send_notification("dom_text", serde_json::json!({ "id": id, "text": text }));
        self
    }

    /// Blocking alert on the host page; also logged so native runs see it.
    pub fn alert(&mut self, message: &str) -> &mut Self {
        error!("Alert: {}", message);
        self.rpc_interface
            .send_notification("alert", serde_json::json!({ "message": message }));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_become_notifications_in_order() {
        let mut rpc_interface = WebRpcInterface::default();
        Dom::new(&mut rpc_interface)
            .hide("landing-page")
            .show("ar-view")
            .set_text("subtitle", "Hello");

        let sent = rpc_interface.pending_notifications();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].method, "dom_display");
        assert_eq!(sent[0].params["display"], "none");
        assert_eq!(sent[1].params["id"], "ar-view");
        assert_eq!(sent[2].method, "dom_text");
        assert_eq!(sent[2].params["text"], "Hello");
    }
}
