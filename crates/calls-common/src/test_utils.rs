//! Test utilities and shared fixtures for the calls911 workspace.
//!
//! Enabled for dependent crates through the `testing` feature.

use std::io::Write;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// CSV fixtures shaped like the Montgomery County 911 export.
pub mod csv_fixtures {
    /// Header row of the export, including the trailing `e` column.
    pub const HEADER: &str = "lat,lng,desc,zip,title,timeStamp,twp,addr,e";

    /// A small, well-formed input spanning several reasons, days and months.
    pub const SAMPLE: &str = "\
lat,lng,desc,zip,title,timeStamp,twp,addr,e
40.2978759,-75.5812935,REINDEER CT & DEAD END;  NEW HANOVER; Station 332;,19525,EMS: BACK PAINS/INJURY,2015-12-10 17:40:00,NEW HANOVER,REINDEER CT & DEAD END,1
40.2580614,-75.2646799,BRIAR PATH & WHITEMARSH LN;  HATFIELD TOWNSHIP; Station 345;,19446,EMS: DIABETIC EMERGENCY,2015-12-10 17:40:00,HATFIELD TOWNSHIP,BRIAR PATH & WHITEMARSH LN,1
40.1211818,-75.3519752,HAWS AVE; NORRISTOWN;,19401,Fire: GAS-ODOR/LEAK,2015-12-10 17:40:00,NORRISTOWN,HAWS AVE,1
40.1161530,-75.3435130,AIRY ST & SWEDE ST;  NORRISTOWN; Station 308A;,19401,EMS: CARDIAC EMERGENCY,2015-12-10 17:40:01,NORRISTOWN,AIRY ST & SWEDE ST,1
40.2514920,-75.6033497,CHERRYWOOD CT & DEAD END;  LOWER POTTSGROVE; Station 329;,,EMS: DIZZINESS,2015-12-10 17:40:01,LOWER POTTSGROVE,CHERRYWOOD CT & DEAD END,1
40.2531590,-75.2830600,CANNON AVE & W 9TH ST;  LANSDALE; Station 345;,19446,EMS: HEAD INJURY,2015-12-10 17:40:01,LANSDALE,CANNON AVE & W 9TH ST,1
40.1821111,-75.1274750,LAUREL AVE & OAKDALE AVE;  HORSHAM; Station 352;,19044,EMS: NAUSEA/VOMITING,2015-12-10 17:40:01,HORSHAM,LAUREL AVE & OAKDALE AVE,1
40.2172860,-75.4059570,COLLEGEVILLE RD & LYWISKI RD;  SKIPPACK; Station 336;,19426,EMS: RESPIRATORY EMERGENCY,2015-12-10 17:40:01,SKIPPACK,COLLEGEVILLE RD & LYWISKI RD,1
40.2898720,-75.3998770,MAIN ST & OLD SUMNEYTOWN PIKE;  LOWER SALFORD; Station 344;,19438,EMS: SYNCOPAL EPISODE,2015-12-10 17:40:01,LOWER SALFORD,MAIN ST & OLD SUMNEYTOWN PIKE,1
40.1161530,-75.3435130,AIRY ST & SWEDE ST;  NORRISTOWN;,19401,Traffic: VEHICLE ACCIDENT -,2016-01-04 08:15:00,NORRISTOWN,AIRY ST & SWEDE ST,1
40.1161530,-75.3435130,AIRY ST & SWEDE ST;  NORRISTOWN;,19401,Traffic: DISABLED VEHICLE -,2016-01-09 23:05:00,NORRISTOWN,AIRY ST & SWEDE ST,1
40.2514920,-75.6033497,CHERRYWOOD CT & DEAD END;  LOWER POTTSGROVE;,19464,Fire: FIRE ALARM,2016-02-14 03:30:00,LOWER POTTSGROVE,CHERRYWOOD CT & DEAD END,1
";

    /// Number of data rows in [`SAMPLE`].
    pub const SAMPLE_ROWS: usize = 12;

    /// A single data row built from the given title and timestamp.
    pub fn row(title: &str, timestamp: &str) -> String {
        format!(
            "40.1211818,-75.3519752,HAWS AVE; NORRISTOWN;,19401,{title},{timestamp},NORRISTOWN,HAWS AVE,1"
        )
    }

    /// A complete CSV document (header included) made of the given rows.
    pub fn document(rows: &[String]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}

/// Write `contents` to a fresh temporary `.csv` file that is removed on drop.
pub fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temporary file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary csv");
    file.flush().expect("Failed to flush temporary csv");
    file
}
