use serde::{Deserialize, Serialize};

use crate::offset::OffsetProfile;

/// Shared dataset holding every dynasty's poems in the grouped shape.
pub const SHARED_DATASET: &str = "poem-data.json";

/// Where the frontend finds the CLI's output directory.
pub const DATA_ROOT: &str = "/data";

// ── Which dynasty a page shows ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dynasty {
    /// 六朝
    Liuchao,
    /// 唐朝
    Tang,
    /// 宋朝
    Song,
    /// 元朝
    Yuan,
    /// 明朝
    Ming,
    /// 清朝
    Qing,
    /// 南唐
    Nantang,
    /// 现代
    Modern,
}

/// Per-dynasty page settings.
#[derive(Debug)]
pub struct DynastyConfig {
    pub dynasty: Dynasty,
    pub slug: &'static str,
    /// Substring looked for in the page title.
    pub title_keyword: &'static str,
    pub label: &'static str,
    pub dataset_file: &'static str,
    /// Authors kept when reading from [`SHARED_DATASET`].
    pub poets: &'static [&'static str],
    pub offset_profile: OffsetProfile,
    /// Draw the location name next to each marker.
    pub show_labels: bool,
}

static CONFIGS: [DynastyConfig; 8] = [
    DynastyConfig {
        dynasty: Dynasty::Liuchao,
        slug: "liuchao",
        title_keyword: "六朝",
        label: "六朝",
        dataset_file: "liuchao-map.json",
        poets: &[
            "谢朓", "何逊", "沈炯", "谢灵运", "萧统", "阴铿", "徐伯阳", "庾肩吾", "陈叔宝", "江总",
            "萧纲", "萧子显", "虞骞",
        ],
        offset_profile: OffsetProfile::Landmark,
        show_labels: false,
    },
    DynastyConfig {
        dynasty: Dynasty::Tang,
        slug: "tang",
        title_keyword: "唐朝",
        label: "唐朝",
        dataset_file: "tang-map.json",
        poets: &[
            "李白", "刘禹锡", "罗隐", "韦庄", "常衮", "顾况", "綦毋潜", "权德舆", "皮日休", "唐彦谦",
        ],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Song,
        slug: "song",
        title_keyword: "宋朝",
        label: "宋朝",
        dataset_file: "song-map.json",
        poets: &[
            "王安石", "周邦彦", "辛弃疾", "曾极", "郭祥正", "韩元吉", "贺铸", "孔文昱", "刘克庄",
            "马光祖", "潘阆", "周紫芝", "范成大", "梁栋",
        ],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Yuan,
        slug: "yuan",
        title_keyword: "元朝",
        label: "元朝",
        dataset_file: "yuan-map.json",
        poets: &["萨都剌", "陶宗仪", "许有壬", "张可久", "张翥", "白朴"],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Ming,
        slug: "ming",
        title_keyword: "明朝",
        label: "明朝",
        dataset_file: "ming-map.json",
        poets: &["陈复", "陈沂"],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Qing,
        slug: "qing",
        title_keyword: "清朝",
        label: "清朝",
        dataset_file: "qing-map.json",
        poets: &["乾隆", "杜文澜"],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Nantang,
        slug: "nantang",
        title_keyword: "南唐",
        label: "南唐",
        dataset_file: "nantang-map.json",
        poets: &["冯延巳", "韩熙载", "李璟", "徐铉"],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
    DynastyConfig {
        dynasty: Dynasty::Modern,
        slug: "modern",
        title_keyword: "现代",
        label: "现当代",
        dataset_file: "modern-map.json",
        poets: &["现代诗人"],
        offset_profile: OffsetProfile::Subtle,
        show_labels: true,
    },
];

impl Dynasty {
    /// Title keywords are checked in this order; the first hit wins.
    pub const ALL: [Dynasty; 8] = [
        Self::Liuchao,
        Self::Tang,
        Self::Song,
        Self::Ming,
        Self::Qing,
        Self::Yuan,
        Self::Nantang,
        Self::Modern,
    ];

    /// Pick the dynasty a page is about from its title. Falls back to 六朝.
    pub fn from_title(title: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| title.contains(d.config().title_keyword))
            .unwrap_or(Self::Liuchao)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.config().slug == slug)
    }

    pub fn config(&self) -> &'static DynastyConfig {
        let i = match self {
            Self::Liuchao => 0,
            Self::Tang => 1,
            Self::Song => 2,
            Self::Yuan => 3,
            Self::Ming => 4,
            Self::Qing => 5,
            Self::Nantang => 6,
            Self::Modern => 7,
        };
        &CONFIGS[i]
    }

    pub fn slug(&self) -> &'static str {
        self.config().slug
    }

    pub fn as_chinese(&self) -> &'static str {
        self.config().label
    }

    /// Name of the deduplicated output written for this dynasty.
    pub fn locations_file(&self) -> String {
        format!("{}-locations.json", self.slug())
    }

    /// URL the map page fetches its locations from.
    pub fn locations_url(&self) -> String {
        format!("{DATA_ROOT}/{}", self.locations_file())
    }
}

impl std::fmt::Display for Dynasty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Dynasty {
    type Err = crate::LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| crate::LoadError::UnknownDynasty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_table_matches_enum() {
        for d in Dynasty::ALL {
            assert_eq!(d.config().dynasty, d);
            assert_eq!(d.config().dataset_file, format!("{}-map.json", d.slug()));
        }
    }

    #[test]
    fn test_from_title() {
        assert_eq!(Dynasty::from_title("六朝诗词地图"), Dynasty::Liuchao);
        assert_eq!(Dynasty::from_title("唐朝诗词地图"), Dynasty::Tang);
        assert_eq!(Dynasty::from_title("南唐诗词地图"), Dynasty::Nantang);
        assert_eq!(Dynasty::from_title("元朝 · 金陵"), Dynasty::Yuan);
        assert_eq!(Dynasty::from_title("现代南京"), Dynasty::Modern);
    }

    #[test]
    fn test_from_title_defaults_to_liuchao() {
        assert_eq!(Dynasty::from_title("金陵诗词地图"), Dynasty::Liuchao);
        assert_eq!(Dynasty::from_title(""), Dynasty::Liuchao);
    }

    #[test]
    fn test_slug_round_trip_and_parse_error() {
        assert_eq!(Dynasty::from_slug("nantang"), Some(Dynasty::Nantang));
        assert_eq!(Dynasty::from_slug("han"), None);
        assert_eq!("song".parse::<Dynasty>().unwrap(), Dynasty::Song);
        assert!(matches!(
            "han".parse::<Dynasty>(),
            Err(crate::LoadError::UnknownDynasty(s)) if s == "han"
        ));
        assert_eq!(Dynasty::Qing.locations_file(), "qing-locations.json");
        assert_eq!(Dynasty::Qing.locations_url(), "/data/qing-locations.json");
    }

    #[test]
    fn test_serde_uses_slug() {
        assert_eq!(serde_json::to_string(&Dynasty::Nantang).unwrap(), "\"nantang\"");
    }
}
