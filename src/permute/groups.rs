// src/permute/groups.rs
//! Named substitution groups used by [`super::extrapolate`].

const APP_FUNCTIONS: &[&str] = &[
    "console", "panel", "admin", "portal",
];

const TERRIBLE_VERSION_MANAGEMENT: &[&str] = &[
    "new", "old", "backup", "newer", "newest", "next",
];

const APPLICATION_THINGS: &[&str] = &[
    "app", "api", "ui", "graphql",
];

const MARKETING_SITES: &[&str] = &[
    "www", "www1", "www2", "www3", "support", "partners", "community", "helpdesk", "status",
];

const ENVIRONMENTS: &[&str] = &[
    "prod", "prd", "dev", "stage", "stg", "staging", "test", "eng", "ops", "devops",
];

const AWS_REGIONS: &[&str] = &[
    "af-south-1", "ap-east-1", "ap-northeast-1", "ap-northeast-2", "ap-northeast-3",
    "ap-south-1", "ap-south-2", "ap-southeast-1", "ap-southeast-2", "ap-southeast-3",
    "ap-southeast-4", "ap-southeast-5", "ca-central-1", "ca-west-1", "eu-central-1",
    "eu-central-2", "eu-north-1", "eu-south-1", "eu-south-2", "eu-west-1", "eu-west-2",
    "eu-west-3", "il-central-1", "me-central-1", "me-south-1", "sa-east-1", "us-east-1",
    "us-east-2", "us-west-1", "us-west-2",
];

const COUNTRY_CODES: &[&str] = &[
    "af", "al", "dz", "as", "ad", "ao", "ai", "aq", "ag", "ar", "am", "aw", "au", "at", "az",
    "bs", "bh", "bd", "bb", "by", "be", "bz", "bj", "bm", "bt", "bo", "bq", "ba", "bw", "bv",
    "br", "io", "bn", "bg", "bf", "bi", "cv", "kh", "cm", "ca", "ky", "cf", "td", "cl", "cn",
    "cx", "cc", "co", "km", "cd", "cg", "ck", "cr", "hr", "cu", "cw", "cy", "cz", "ci", "dk",
    "dj", "dm", "do", "ec", "eg", "sv", "gq", "er", "ee", "sz", "et", "fk", "fo", "fj", "fi",
    "fr", "gf", "pf", "tf", "ga", "gm", "ge", "de", "gh", "gi", "gr", "gl", "gd", "gp", "gu",
    "gt", "gg", "gn", "gw", "gy", "ht", "hm", "va", "hn", "hk", "hu", "is", "in", "id", "ir",
    "iq", "ie", "im", "il", "it", "jm", "jp", "je", "jo", "kz", "ke", "ki", "kp", "kr", "kw",
    "kg", "la", "lv", "lb", "ls", "lr", "ly", "li", "lt", "lu", "mo", "mg", "mw", "my", "mv",
    "ml", "mt", "mh", "mq", "mr", "mu", "yt", "mx", "fm", "md", "mc", "mn", "me", "ms", "ma",
    "mz", "mm", "na", "nr", "np", "nl", "nc", "nz", "ni", "ne", "ng", "nu", "nf", "mp", "no",
    "om", "pk", "pw", "ps", "pa", "pg", "py", "pe", "ph", "pn", "pl", "pt", "pr", "qa", "mk",
    "ro", "ru", "rw", "re", "bl", "sh", "kn", "lc", "mf", "pm", "vc", "ws", "sm", "st", "sa",
    "sn", "rs", "sc", "sl", "sg", "sx", "sk", "si", "sb", "so", "za", "gs", "ss", "es", "lk",
    "sd", "sr", "sj", "se", "ch", "sy", "tw", "tj", "tz", "th", "tl", "tg", "tk", "to", "tt",
    "tn", "tr", "tm", "tc", "tv", "ug", "ua", "ae", "gb", "um", "us", "uy", "uz", "vu", "ve",
    "vn", "vg", "vi", "wf", "eh", "ye", "zm", "zw", "ax",
];

pub const REPLACEMENT_GROUPS: &[(&str, &[&str])] = &[
    ("App functions", APP_FUNCTIONS),
    ("Terrible version management", TERRIBLE_VERSION_MANAGEMENT),
    ("Application Things", APPLICATION_THINGS),
    ("Marketing Sites", MARKETING_SITES),
    ("Environments", ENVIRONMENTS),
    ("AWS Regions", AWS_REGIONS),
    ("Country Codes", COUNTRY_CODES),
];
