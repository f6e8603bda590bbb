use otspec::tables;
use otspec::types::*;

/// The 'hhea' OpenType tag.
pub const TAG: Tag = crate::tag!("hhea");

tables!(hhea {
    uint16 majorVersion
    uint16 minorVersion
    FWORD ascender
    FWORD descender
    FWORD lineGap
    UFWORD  advanceWidthMax
    FWORD   minLeftSideBearing
    FWORD   minRightSideBearing
    FWORD   xMaxExtent
    int16   caretSlopeRise
    int16   caretSlopeRun
    int16   caretOffset
    int16   reserved0
    int16   reserved1
    int16   reserved2
    int16   reserved3
    int16   metricDataFormat
    uint16  numberOfHMetrics
});
