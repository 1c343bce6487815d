use serde::{Serialize, Serializer};

/// Icons the site renders next to service cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceIcon {
    Handshake,
    Search,
    Users,
    Package,
    MessageSquare,
    FileText,
}

const ICON_TABLE: [(&str, ServiceIcon); 6] = [
    ("Handshake", ServiceIcon::Handshake),
    ("Search", ServiceIcon::Search),
    ("Users", ServiceIcon::Users),
    ("Package", ServiceIcon::Package),
    ("MessageSquare", ServiceIcon::MessageSquare),
    ("FileText", ServiceIcon::FileText),
];

impl ServiceIcon {
    pub fn from_name(name: &str) -> Option<Self> {
        ICON_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, icon)| *icon)
    }

    pub fn name(self) -> &'static str {
        ICON_TABLE
            .iter()
            .find(|(_, icon)| *icon == self)
            .map(|(key, _)| *key)
            .unwrap_or("Handshake")
    }
}

impl Serialize for ServiceIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOffering {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: ServiceIcon,
}

pub fn service_offerings() -> Vec<ServiceOffering> {
    vec![
        ServiceOffering {
            id: "brokerage",
            title: "Green Coffee Brokerage",
            description: "We connect international buyers with quality-verified coffees from our network of trusted partners across Kenya, Ethiopia, and Uganda.",
            icon: ServiceIcon::Handshake,
        },
        ServiceOffering {
            id: "sourcing",
            title: "Custom Sourcing",
            description: "Tell us your requirements (origin, profile, volume, timing) and we'll identify suitable coffees from our partner network.",
            icon: ServiceIcon::Search,
        },
        ServiceOffering {
            id: "matchmaking",
            title: "Buyer-Partner Matching",
            description: "We facilitate introductions between buyers and suitable producing partners based on quality expectations and relationship fit.",
            icon: ServiceIcon::Users,
        },
        ServiceOffering {
            id: "sampling",
            title: "Sampling Coordination",
            description: "We coordinate sample requests and shipments between partners and buyers, ensuring timely delivery and proper documentation.",
            icon: ServiceIcon::Package,
        },
        ServiceOffering {
            id: "quality",
            title: "Quality Communication",
            description: "We relay cupping feedback and quality requirements between buyers and partners, supporting continuous improvement.",
            icon: ServiceIcon::MessageSquare,
        },
        ServiceOffering {
            id: "contracting",
            title: "Contracting Support",
            description: "We support the contracting and export process through our licensed partner network, ensuring smooth transactions.",
            icon: ServiceIcon::FileText,
        },
    ]
}
