use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Questions shown on the brokerage & sourcing page.
pub fn brokerage_faqs() -> Vec<Faq> {
    vec![
        Faq {
            question: "What is the difference between a coffee broker and an exporter?",
            answer: "A broker facilitates connections between buyers and sellers without necessarily owning or physically handling the coffee. An exporter holds the license to export coffee from an origin country and manages the logistics of shipment. Imwera Coffee operates as a broker, connecting international buyers with quality coffees through our partner network, which includes licensed exporters.",
        },
        Faq {
            question: "Does Imwera Coffee export Kenyan coffee directly?",
            answer: "Not currently. Imwera Coffee is not yet a licensed Kenyan coffee exporter. All Kenyan coffee exports are facilitated through our licensed partner network.",
        },
        Faq {
            question: "What are your minimum order quantities?",
            answer: "This varies by partner and origin. Some partners can accommodate sample-size orders (1-5 bags) for evaluation, while others require minimum quantities of 10+ bags or container-level volumes.",
        },
        Faq {
            question: "How does sampling work?",
            answer: "Submit your interest with specifications, we identify suitable lots, the partner prepares and ships samples, and you evaluate and provide feedback. Allow 2-4 weeks for sample delivery to most international destinations.",
        },
        Faq {
            question: "What payment terms do you offer?",
            answer: "Payment terms are negotiated on a case-by-case basis and depend on relationship history, volume, and partner requirements.",
        },
        Faq {
            question: "Can I visit your partner farms or washing stations?",
            answer: "Yes, we can facilitate origin visits for serious buyers. Origin trips require advance planning and coordination with partners.",
        },
        Faq {
            question: "How do you ensure quality consistency?",
            answer: "Quality consistency comes from partner selection, ongoing communication, and clear feedback loops. Pre-shipment samples are always available for final verification before shipment.",
        },
        Faq {
            question: "What documentation do you provide?",
            answer: "Lot information and traceability details, cupping scores and tasting notes where available, phytosanitary certificates, weight certificates, and shipping documentation.",
        },
        Faq {
            question: "How far in advance should I plan my purchases?",
            answer: "We recommend engaging 3-6 months before your desired delivery window, especially for specific lots or limited-availability coffees.",
        },
        Faq {
            question: "Do you work with small roasters or only large buyers?",
            answer: "We work with buyers across the volume spectrum, from small specialty roasters seeking micro-lots to larger importers sourcing container quantities.",
        },
    ]
}
