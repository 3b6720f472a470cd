//! Message, group and sender metrics derived from the platform database

use prometheus::{IntGauge, IntGaugeVec, Opts, Registry};

/// Gauges populated by the store query batch
pub struct StoreMetrics {
    pub messages_total: IntGauge,
    pub messages_today: IntGauge,
    pub messages_last_24h: IntGauge,
    pub messages_last_hour: IntGauge,
    pub messages_direct_total: IntGauge,
    pub messages_group_total: IntGauge,
    pub messages_with_media: IntGauge,

    /// Messages per group, top 50 (labels: group_jid, group_name)
    pub messages_per_group: IntGaugeVec,

    /// Messages per sender, top 10 (labels: sender_jid, sender_name)
    pub messages_per_sender: IntGaugeVec,

    pub groups_total: IntGauge,
    pub groups_managed: IntGauge,
    pub groups_with_spam_notification: IntGauge,
    pub groups_with_community: IntGauge,

    pub senders_total: IntGauge,
    pub senders_active_24h: IntGauge,

    pub reactions_total: IntGauge,
    pub optouts_total: IntGauge,
    pub kb_topics_total: IntGauge,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> IntGauge {
    let g = IntGauge::new(name, help)
        .unwrap_or_else(|e| panic!("Failed to create {name} metric: {e}"));
    registry
        .register(Box::new(g.clone()))
        .unwrap_or_else(|e| panic!("Failed to register {name}: {e}"));
    g
}

impl StoreMetrics {
    /// Create and register the store metric group
    pub fn new(registry: &Registry) -> Self {
        let messages_per_group = IntGaugeVec::new(
            Opts::new("whatsapp_messages_per_group", "Number of messages per group"),
            &["group_jid", "group_name"],
        )
        .expect("Failed to create whatsapp_messages_per_group metric");
        registry
            .register(Box::new(messages_per_group.clone()))
            .expect("Failed to register whatsapp_messages_per_group");

        let messages_per_sender = IntGaugeVec::new(
            Opts::new(
                "whatsapp_messages_per_sender",
                "Number of messages per sender (top 10)",
            ),
            &["sender_jid", "sender_name"],
        )
        .expect("Failed to create whatsapp_messages_per_sender metric");
        registry
            .register(Box::new(messages_per_sender.clone()))
            .expect("Failed to register whatsapp_messages_per_sender");

        Self {
            messages_total: gauge(
                registry,
                "whatsapp_messages_total",
                "Total number of messages in database",
            ),
            messages_today: gauge(
                registry,
                "whatsapp_messages_today",
                "Number of messages received today",
            ),
            messages_last_24h: gauge(
                registry,
                "whatsapp_messages_last_24h",
                "Number of messages in the last 24 hours",
            ),
            messages_last_hour: gauge(
                registry,
                "whatsapp_messages_last_hour",
                "Number of messages in the last hour",
            ),
            messages_direct_total: gauge(
                registry,
                "whatsapp_messages_direct_total",
                "Total number of direct/private messages",
            ),
            messages_group_total: gauge(
                registry,
                "whatsapp_messages_group_total",
                "Total number of group messages",
            ),
            messages_with_media: gauge(
                registry,
                "whatsapp_messages_with_media_total",
                "Total messages containing media",
            ),
            messages_per_group,
            messages_per_sender,
            groups_total: gauge(
                registry,
                "whatsapp_groups_total",
                "Total number of WhatsApp groups",
            ),
            groups_managed: gauge(
                registry,
                "whatsapp_groups_managed",
                "Number of managed groups",
            ),
            groups_with_spam_notification: gauge(
                registry,
                "whatsapp_groups_with_spam_notification",
                "Number of groups with spam notification enabled",
            ),
            groups_with_community: gauge(
                registry,
                "whatsapp_groups_with_community",
                "Number of groups with community keys",
            ),
            senders_total: gauge(
                registry,
                "whatsapp_senders_total",
                "Total number of unique senders/contacts",
            ),
            senders_active_24h: gauge(
                registry,
                "whatsapp_senders_active_24h",
                "Number of active senders in last 24 hours",
            ),
            reactions_total: gauge(
                registry,
                "whatsapp_reactions_total",
                "Total number of message reactions",
            ),
            optouts_total: gauge(
                registry,
                "whatsapp_optouts_total",
                "Total number of opt-outs",
            ),
            kb_topics_total: gauge(
                registry,
                "whatsapp_kb_topics_total",
                "Total number of knowledge base topics",
            ),
        }
    }

    /// Replace the per-group ranking with the given entries
    ///
    /// The gauge is cleared first so groups that fell out of the ranking
    /// do not linger from a previous pass.
    pub fn set_top_groups(&self, entries: &[(String, String, i64)]) {
        self.messages_per_group.reset();
        for (jid, name, count) in entries {
            self.messages_per_group
                .with_label_values(&[jid, name])
                .set(*count);
        }
    }

    /// Replace the per-sender ranking with the given entries
    pub fn set_top_senders(&self, entries: &[(String, String, i64)]) {
        self.messages_per_sender.reset();
        for (jid, name, count) in entries {
            self.messages_per_sender
                .with_label_values(&[jid, name])
                .set(*count);
        }
    }
}
