//! Built-in alias table
//!
//! Maps normalized channel keys to the canonical logo filenames published in
//! the UK logo catalog. Order matters: fuzzy matching breaks score ties in
//! favour of the entry listed first.

pub(crate) const BUILTIN_ALIASES: &[(&str, &str)] = &[
    // Factual
    ("discovery", "discovery-channel-uk.png"),
    ("discoverychannel", "discovery-channel-uk.png"),
    ("discoveryhistory", "discovery-history-uk.png"),
    ("discoveryscience", "discovery-science-uk.png"),
    ("discoveryturbo", "discovery-turbo-uk.png"),
    ("discoverydmax", "dmax-uk.png"),
    ("dmax", "dmax-uk.png"),
    ("investigationdiscovery", "investigation-discovery-uk.png"),
    ("animalplanet", "animal-planet-uk.png"),
    // Sky entertainment and cinema
    ("skydocumentaries", "sky-documentaries-uk.png"),
    ("skynature", "sky-nature-uk.png"),
    ("skyhistory", "sky-history-uk.png"),
    ("skyhistory2", "sky-history-2-uk.png"),
    ("skycrime", "sky-crime-uk.png"),
    ("skyatlantic", "sky-atlantic-uk.png"),
    ("skyaction", "sky-cinema-action-uk.png"),
    ("skyanimation", "sky-cinema-animation-uk.png"),
    ("skycinemacomedy", "sky-cinema-comedy-uk.png"),
    ("skydrama", "sky-cinema-drama-uk.png"),
    ("skyfamily", "sky-cinema-family-uk.png"),
    ("skyscifihorror", "sky-cinema-sci-fi-and-horror-uk.png"),
    ("skypremiere", "sky-cinema-premiere-uk.png"),
    ("skyselect", "sky-cinema-select-uk.png"),
    ("skygreats", "sky-cinema-greats-uk.png"),
    ("skyhits", "sky-cinema-hits-uk.png"),
    ("skythriller", "sky-cinema-thriller-uk.png"),
    ("skycomedy", "sky-comedy-uk.png"),
    ("skyarts", "sky-arts-uk.png"),
    ("skymax", "sky-max-uk.png"),
    ("skymix", "sky-mix-uk.png"),
    ("skyreplay", "sky-replay-uk.png"),
    ("skywitness", "sky-witness-uk.png"),
    ("skykids", "sky-kids-uk.png"),
    ("skyscifi", "sky-sci-fi-uk.png"),
    ("skyshowcase", "sky-showcase-uk.png"),
    // National Geographic
    ("natgeo", "national-geographic-uk.png"),
    ("nationalgeography", "national-geographic-uk.png"),
    ("natgeowild", "national-geographic-wild-uk.png"),
    ("nationalgeowild", "national-geographic-wild-uk.png"),
    // BBC
    ("bbcone", "bbc-one-uk.png"),
    ("bbctwo", "bbc-two-uk.png"),
    ("bbcthree", "bbc-three-uk.png"),
    ("bbcfour", "bbc-four-uk.png"),
    ("cbbc", "bbc-cbbc-uk.png"),
    ("cbeebies", "bbc-cbeebies-uk.png"),
    ("bbcnews", "bbc-news-uk.png"),
    ("bbcparliament", "bbc-parliament-uk.png"),
    ("bbcworldnews", "bbc-world-news-uk.png"),
    // ITV
    ("itv1", "itv-1-uk.png"),
    ("itv2", "itv-2-uk.png"),
    ("itv3", "itv-3-uk.png"),
    ("itv4", "itv-4-uk.png"),
    ("itvbe", "itv-be-uk.png"),
    // Channel 4
    ("channel4", "channel-4-uk.png"),
    ("more4", "4-more-uk.png"),
    ("e4", "e-4-uk.png"),
    ("e4extra", "e-4-extra-uk.png"),
    ("4seven", "4-seven-uk.png"),
    ("film4", "film-4-uk.png"),
    // Channel 5
    ("channel5", "channel-5-uk.png"),
    ("5action", "5-action-uk.png"),
    ("5select", "5-select-uk.png"),
    ("5star", "5-star-uk.png"),
    ("5usa", "5-usa-uk.png"),
    ("fiveusa", "5-usa-uk.png"),
    // Kids
    ("cartoonnetwork", "cartoon-network-uk.png"),
    ("cartoonito", "cartoonito-uk.png"),
    ("boomerang", "boomerang-uk.png"),
    ("nickelodeon", "nickelodeon-uk.png"),
    ("nickjunior", "nick-jr-uk.png"),
    ("nickjrtoo", "nick-jr-too-uk.png"),
    ("nicktoons", "nick-toons-uk.png"),
    ("disneychannel", "disney-channel-uk.png"),
    ("disneyjunior", "disney-jr-uk.png"),
    ("disneyjr", "disney-jr-uk.png"),
    ("disneyxd", "disney-xd-uk.png"),
    ("babytv", "baby-tv-uk.png"),
    ("pop", "pop-uk.png"),
    ("popmax", "pop-max-uk.png"),
    // Sky Sports
    ("skysportsnews", "sky-sports-news-uk.png"),
    ("skysportsmainevent", "sky-sports-main-event-uk.png"),
    ("skysportsfootball", "sky-sports-football-uk.png"),
    ("skysportspremiereleague", "sky-sports-premier-league-uk.png"),
    ("skysportsf1", "sky-sports-f1-uk.png"),
    ("skysportsgolf", "sky-sports-golf-uk.png"),
    ("skysportsplus", "sky-sports-plus-hz-uk.png"),
    ("skysportsaction", "sky-sports-action-uk.png"),
    ("skysportsarena", "sky-sports-arena-uk.png"),
    ("skysportstennis", "sky-sports-tennis-uk.png"),
    ("skysportscricket", "sky-sports-cricket-uk.png"),
    ("skysportsmix", "sky-sports-mix-uk.png"),
    ("skysportsracing", "sky-sports-racing-uk.png"),
    // TNT Sports
    ("tntsports1", "tnt-sports-1-uk.png"),
    ("tntsports2", "tnt-sports-2-uk.png"),
    ("tntsports3", "tnt-sports-3-uk.png"),
    ("tntsports4", "tnt-sports-4-uk.png"),
    ("tntsportsultimate", "tnt-sports-ultimate-uk.png"),
    // Eurosport
    ("eurosport1", "eurosport-1-uk.png"),
    ("eurosport2", "eurosport-2-uk.png"),
    ("eurosport4k", "eurosport-4k-uk.png"),
    // Other sport
    ("premiersports1", "premier-sports-1-uk.png"),
    ("premiersports2", "premier-sports-2-uk.png"),
    ("laligatv", "laliga-tv-uk.png"),
    ("mutv", "mutv-uk.png"),
    ("lfctv", "lfctv-uk.png"),
    ("liverpoolfctv", "lfctv-uk.png"),
    // News
    ("skynews", "sky-news-uk.png"),
    ("aljazeera", "aljazeera-uk.png"),
    ("arisenews", "arise-news-uk.png"),
    ("gbnews", "gb-news-uk.png"),
    ("talktv", "talk-tv-uk.png"),
    // General entertainment and music
    ("gold", "gold-uk.png"),
    ("comedycentral", "comedy-central-uk.png"),
    ("dave", "dave-uk.png"),
    ("davejavvu", "dave-ja-vu-uk.png"),
    ("quest", "quest-uk.png"),
    ("questred", "quest-red-uk.png"),
    ("tlc", "tlc-uk.png"),
    ("drama", "drama-uk.png"),
    ("yesterday", "yesterday-uk.png"),
    ("eden", "eden-uk.png"),
    ("foodnetwork", "food-network-uk.png"),
    ("hgtv", "hgtv-uk.png"),
    ("syfy", "syfy-uk.png"),
    ("w", "w-network-uk.png"),
    ("challenge", "challenge-uk.png"),
    ("horseandcountry", "horse-and-country-uk.png"),
    ("smithsonian", "smithsonian-channel-uk.png"),
    ("crime", "crime-and-investigation-uk.png"),
    ("crimeandinvestigationnetwork", "crime-and-investigation-uk.png"),
    ("together", "together-tv-uk.png"),
    ("blaze", "blaze-uk.png"),
    ("realityxtra", "reality-xtra-uk.png"),
    ("s4c", "s4c-uk.png"),
    ("stv", "stv-uk.png"),
    ("boxnation", "box-nation-uk.png"),
    ("boxhits", "box-hits-uk.png"),
    ("kerrangtv", "kerrang-tv-uk.png"),
    ("mtvbase", "mtv-base-uk.png"),
    ("mtvhits", "mtv-hits-uk.png"),
    ("mtvmusic", "mtv-music-uk.png"),
    ("mtv", "mtv-uk.png"),
    ("now70s", "now-70s-uk.png"),
    ("now80s", "now-80s-uk.png"),
    ("now90s", "now-90s-uk.png"),
    ("clublandtv", "clubland-uk.png"),
    ("rtenewsnow", "rte-news-now-uk.png"),
    ("lifetime", "lifetime-uk.png"),
    ("movies24", "movies-24-uk.png"),
    ("comedyxtra", "comedy-central-extra-uk.png"),
    ("legend", "legend-uk.png"),
    ("greataction", "great-action-uk.png"),
    ("greatmovies", "great-movies-uk.png"),
    ("alibi", "alibi-uk.png"),
    ("mtvclassic", "mtv-classic-uk.png"),
];
