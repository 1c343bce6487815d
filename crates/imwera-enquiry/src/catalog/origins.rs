use serde::{Deserialize, Serialize};

/// Display names accepted by the sourcing form's "origins of interest" field.
pub const ORIGIN_NAMES: [&str; 3] = ["Kenya", "Ethiopia", "Uganda"];

/// Producing origins covered by the partner network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Kenya,
    Ethiopia,
    Uganda,
}

impl Origin {
    pub const ALL: [Origin; 3] = [Origin::Kenya, Origin::Ethiopia, Origin::Uganda];

    pub fn name(self) -> &'static str {
        match self {
            Origin::Kenya => ORIGIN_NAMES[0],
            Origin::Ethiopia => ORIGIN_NAMES[1],
            Origin::Uganda => ORIGIN_NAMES[2],
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Origin::Kenya => "kenya",
            Origin::Ethiopia => "ethiopia",
            Origin::Uganda => "uganda",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        Self::ALL
            .into_iter()
            .find(|origin| origin.slug().eq_ignore_ascii_case(slug))
    }

    pub fn profile(self) -> OriginProfile {
        match self {
            Origin::Kenya => OriginProfile {
                origin: self,
                name: self.name(),
                slug: self.slug(),
                tagline: "Renowned for bright acidity and complex fruit notes",
                regions: &["Nyeri", "Kirinyaga", "Murang'a", "Kiambu", "Embu", "Meru"],
                processing_methods: &["Fully Washed", "Honey Process", "Natural"],
                harvest_period: "Main crop: October – December | Fly crop: April – June",
                availability_window: "Main crop coffees typically available January through August. Fly crop lots available July through November.",
            },
            Origin::Ethiopia => OriginProfile {
                origin: self,
                name: self.name(),
                slug: self.slug(),
                tagline: "The birthplace of coffee, unmatched in diversity",
                regions: &["Yirgacheffe", "Sidama", "Guji", "Limu", "Harrar"],
                processing_methods: &["Washed", "Natural", "Honey"],
                harvest_period: "October – January",
                availability_window: "Washed and natural lots typically arrive from March onwards following ECX and direct-trade release.",
            },
            Origin::Uganda => OriginProfile {
                origin: self,
                name: self.name(),
                slug: self.slug(),
                tagline: "Mount Elgon Arabica and fine Robusta from the Pearl of Africa",
                regions: &["Mount Elgon (Bugisu)", "Rwenzori", "West Nile", "Masaka & Kalungu"],
                processing_methods: &["Washed", "Natural", "Honey"],
                harvest_period: "Main crop: October – February | Fly crop: May – August",
                availability_window: "Arabica lots available from February; Robusta available year-round across both harvest cycles.",
            },
        }
    }
}

/// Summary card data for an origin page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginProfile {
    pub origin: Origin,
    pub name: &'static str,
    pub slug: &'static str,
    pub tagline: &'static str,
    pub regions: &'static [&'static str],
    pub processing_methods: &'static [&'static str],
    pub harvest_period: &'static str,
    pub availability_window: &'static str,
}
